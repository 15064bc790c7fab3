use serde::{Deserialize, Serialize};

use crate::models::period::Period;
use crate::models::player::PlayerRecord;
use crate::models::scoring::{ActionCounts, Leaderboard};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    pub period: Period,
    pub total_games: i64,
    pub leaderboard: Leaderboard,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActionPoints {
    pub action_type: String,
    pub points: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameBreakdownEntry {
    pub game_id: String,
    pub game_date: String,
    pub actions: Vec<ActionPoints>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatsResponse {
    pub player: PlayerRecord,
    pub period: Period,
    pub total_games: i64,
    pub games_played: i64,
    pub absence_rate: f64,
    pub total_points: f64,
    pub stats: ActionCounts,
    pub game_breakdown: Vec<GameBreakdownEntry>,
}
