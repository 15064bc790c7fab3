use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// A notable in-game event attributed to exactly one player.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    FirstDead,
    FirstExploded,
    BarkingDiffuse,
    BarkingDead,
    SecondPlace,
    Win,
}

impl ActionKind {
    pub const ALL: [ActionKind; 6] = [
        ActionKind::FirstDead,
        ActionKind::FirstExploded,
        ActionKind::BarkingDiffuse,
        ActionKind::BarkingDead,
        ActionKind::SecondPlace,
        ActionKind::Win,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::FirstDead => "first_dead",
            ActionKind::FirstExploded => "first_exploded",
            ActionKind::BarkingDiffuse => "barking_diffuse",
            ActionKind::BarkingDead => "barking_dead",
            ActionKind::SecondPlace => "second_place",
            ActionKind::Win => "win",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        ActionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == tag)
    }
}

/// An action tag as read back from storage. Tags written by a newer rule set
/// may not map onto a known kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedAction {
    Known(ActionKind),
    Unrecognized(String),
}

impl RecordedAction {
    pub fn from_tag(tag: &str) -> Self {
        match ActionKind::parse(tag) {
            Some(kind) => RecordedAction::Known(kind),
            None => RecordedAction::Unrecognized(tag.to_string()),
        }
    }

    pub fn kind(&self) -> Option<ActionKind> {
        match self {
            RecordedAction::Known(kind) => Some(*kind),
            RecordedAction::Unrecognized(_) => None,
        }
    }
}

impl From<ActionKind> for RecordedAction {
    fn from(kind: ActionKind) -> Self {
        RecordedAction::Known(kind)
    }
}

/// Point value per action kind. Injected into the scoring engine so that
/// different rule revisions can coexist.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PointWeights {
    pub first_dead: i64,
    pub first_exploded: i64,
    pub barking_diffuse: i64,
    pub barking_dead: i64,
    pub second_place: i64,
    pub win: i64,
}

impl PointWeights {
    /// Largest absolute value accepted for a single custom weight.
    pub const MAX_MAGNITUDE: i64 = 1_000_000;

    /// Table used by the leaderboard computation in the earlier revision.
    pub const fn version_a() -> Self {
        Self {
            first_dead: -1,
            first_exploded: -3,
            barking_diffuse: -1,
            barking_dead: -3,
            second_place: 5,
            win: 10,
        }
    }

    /// Table used by the per-game breakdown in the later revision.
    pub const fn version_b() -> Self {
        Self {
            first_dead: -5,
            first_exploded: -1,
            barking_diffuse: -1,
            barking_dead: -3,
            second_place: 5,
            win: 10,
        }
    }

    pub fn weight(&self, kind: ActionKind) -> i64 {
        match kind {
            ActionKind::FirstDead => self.first_dead,
            ActionKind::FirstExploded => self.first_exploded,
            ActionKind::BarkingDiffuse => self.barking_diffuse,
            ActionKind::BarkingDead => self.barking_dead,
            ActionKind::SecondPlace => self.second_place,
            ActionKind::Win => self.win,
        }
    }

    /// Parses a rule file such as:
    ///
    /// ```yaml
    /// first_dead: -5
    /// first_exploded: -1
    /// barking_diffuse: -1
    /// barking_dead: -3
    /// second_place: 5
    /// win: 10
    /// ```
    pub fn from_yaml_str(raw: &str) -> AppResult<Self> {
        if raw.trim().is_empty() {
            return Err(AppError::validation("scoring rule file is empty"));
        }
        let weights: Self = serde_yaml::from_str(raw)
            .map_err(|err| AppError::validation_with_source("invalid scoring rule file", err))?;
        weights.validate()?;
        Ok(weights)
    }

    /// Rejects tables with a weight outside `±MAX_MAGNITUDE`.
    pub fn validate(&self) -> AppResult<()> {
        let out_of_range: Vec<&'static str> = ActionKind::ALL
            .into_iter()
            .filter(|kind| self.weight(*kind).unsigned_abs() > Self::MAX_MAGNITUDE.unsigned_abs())
            .map(|kind| kind.as_str())
            .collect();
        if out_of_range.is_empty() {
            return Ok(());
        }
        Err(AppError::validation_with_details(
            format!("point weights must lie within ±{}", Self::MAX_MAGNITUDE),
            serde_json::json!({ "actionTypes": out_of_range }),
        ))
    }

    pub fn to_yaml_string(&self) -> AppResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Occurrences of each action kind for one player over a period.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionCounts {
    pub first_dead: i64,
    pub first_exploded: i64,
    pub barking_diffuse: i64,
    pub barking_dead: i64,
    pub second_place: i64,
    pub win: i64,
}

impl ActionCounts {
    pub fn from_actions(actions: &[RecordedAction]) -> Self {
        let mut counts = Self::default();
        for kind in actions.iter().filter_map(RecordedAction::kind) {
            counts.add(kind, 1);
        }
        counts
    }

    pub fn add(&mut self, kind: ActionKind, amount: i64) {
        let slot = match kind {
            ActionKind::FirstDead => &mut self.first_dead,
            ActionKind::FirstExploded => &mut self.first_exploded,
            ActionKind::BarkingDiffuse => &mut self.barking_diffuse,
            ActionKind::BarkingDead => &mut self.barking_dead,
            ActionKind::SecondPlace => &mut self.second_place,
            ActionKind::Win => &mut self.win,
        };
        *slot += amount;
    }

    pub fn get(&self, kind: ActionKind) -> i64 {
        match kind {
            ActionKind::FirstDead => self.first_dead,
            ActionKind::FirstExploded => self.first_exploded,
            ActionKind::BarkingDiffuse => self.barking_diffuse,
            ActionKind::BarkingDead => self.barking_dead,
            ActionKind::SecondPlace => self.second_place,
            ActionKind::Win => self.win,
        }
    }
}

/// Engine input for a single player.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerTally {
    pub player_id: String,
    pub player_name: String,
    pub color: String,
    pub actions: Vec<RecordedAction>,
    pub games_played: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub player_id: String,
    pub player_name: String,
    pub color: String,
    pub total_points: f64,
    pub games_played: i64,
    pub total_games: i64,
    pub absence_rate: f64,
    pub stats: ActionCounts,
}

/// Entries ordered by points, highest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub(crate) fn from_sorted(entries: Vec<LeaderboardEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<LeaderboardEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn position_of(&self, player_id: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.player_id == player_id)
    }
}
