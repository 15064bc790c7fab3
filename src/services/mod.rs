pub mod game_service;
pub mod leaderboard_service;
pub mod player_service;
pub mod player_stats_service;
pub mod scoring_engine;
pub mod scoring_rules_service;
