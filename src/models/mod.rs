pub mod game;
pub mod period;
pub mod player;
pub mod scoring;
pub mod settings;
pub mod stats;
