use serde::{Deserialize, Serialize};

use crate::models::scoring::ActionKind;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameParticipant {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameActionRecord {
    pub id: i64,
    pub player_id: String,
    pub player_name: String,
    /// Raw stored tag; may be a kind this build does not know.
    pub action_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub id: String,
    pub game_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<String>,
    pub created_at: String,
    pub participants: Vec<GameParticipant>,
    pub actions: Vec<GameActionRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameActionInput {
    pub player_id: String,
    pub action_type: ActionKind,
}

/// Payload for both creating and replacing a game.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameUpsertInput {
    #[serde(default)]
    pub game_date: Option<String>,
    #[serde(default)]
    pub round: Option<String>,
    pub participants: Vec<String>,
    #[serde(default)]
    pub actions: Vec<GameActionInput>,
}
