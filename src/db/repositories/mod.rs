pub mod game_repository;
pub mod player_repository;
pub mod settings_repository;
pub mod standings_repository;
