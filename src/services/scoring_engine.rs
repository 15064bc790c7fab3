use std::cmp::Ordering;

use tracing::debug;

use crate::models::scoring::{
    ActionCounts, Leaderboard, LeaderboardEntry, PlayerTally, PointWeights, RecordedAction,
};

/// Stateless scoring engine. Turns a player's recorded actions and
/// participation counts into a weighted point total and ranks players
/// into a leaderboard.
///
/// The engine is total over its input domain: negative counts and
/// `games_played > total_games` are scored as computed, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringEngine {
    weights: PointWeights,
}

impl ScoringEngine {
    pub fn new(weights: PointWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &PointWeights {
        &self.weights
    }

    /// Sum of the weight of every action. Unrecognized tags are worth zero.
    ///
    /// Accumulates in `f64` so arbitrary weight tables cannot overflow.
    pub fn compute_base_points(&self, actions: &[RecordedAction]) -> f64 {
        actions
            .iter()
            .map(|action| match action {
                RecordedAction::Known(kind) => self.weights.weight(*kind) as f64,
                RecordedAction::Unrecognized(tag) => {
                    debug!(target: "app::scoring", %tag, "ignoring unrecognized action tag");
                    0.0
                }
            })
            .sum()
    }

    pub fn compute_player_points(
        &self,
        actions: &[RecordedAction],
        total_games: i64,
        games_played: i64,
    ) -> f64 {
        round2(apply_participation_weight(
            self.compute_base_points(actions),
            total_games,
            games_played,
        ))
    }

    pub fn score_player(&self, tally: PlayerTally, total_games: i64) -> LeaderboardEntry {
        let total_points =
            self.compute_player_points(&tally.actions, total_games, tally.games_played);
        let stats = ActionCounts::from_actions(&tally.actions);

        LeaderboardEntry {
            player_id: tally.player_id,
            player_name: tally.player_name,
            color: tally.color,
            total_points,
            games_played: tally.games_played,
            total_games,
            absence_rate: absence_rate(total_games, tally.games_played),
            stats,
        }
    }

    /// Scores every player and orders them by points, highest first. Equal
    /// points fall back to case-insensitive name, then player id.
    pub fn build_leaderboard(&self, players: Vec<PlayerTally>, total_games: i64) -> Leaderboard {
        let mut entries: Vec<LeaderboardEntry> = players
            .into_iter()
            .map(|tally| self.score_player(tally, total_games))
            .collect();

        entries.sort_by(compare_entries);

        debug!(
            target: "app::scoring",
            players = entries.len(),
            total_games,
            "leaderboard built"
        );
        Leaderboard::from_sorted(entries)
    }
}

/// Scales points by the share of period games the player attended.
///
/// * no games in the period: points are kept as-is
/// * the player attended none: zero, whatever the sign of `base_points`
/// * otherwise: `base_points * games_played / total_games`
///
/// The result is rounded to two decimals.
pub fn apply_participation_weight(base_points: f64, total_games: i64, games_played: i64) -> f64 {
    if total_games == 0 {
        return round2(base_points);
    }
    if games_played == 0 {
        return 0.0;
    }

    let participation = games_played as f64 / total_games as f64;
    round2(base_points * participation)
}

/// Percentage of period games the player missed. Not rounded.
pub fn absence_rate(total_games: i64, games_played: i64) -> f64 {
    if total_games == 0 {
        return 0.0;
    }
    (total_games as f64 - games_played as f64) / total_games as f64 * 100.0
}

/// Rounds half away from zero to two decimals. Negative zero collapses to zero.
pub fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

fn compare_entries(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.total_points
        .total_cmp(&a.total_points)
        .then_with(|| {
            a.player_name
                .to_lowercase()
                .cmp(&b.player_name.to_lowercase())
        })
        .then_with(|| a.player_id.cmp(&b.player_id))
}
