use std::collections::HashMap;
use std::sync::Arc;

use tracing::{error, info};

use crate::db::repositories::player_repository::PlayerRepository;
use crate::db::repositories::standings_repository::StandingsRepository;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::period::Period;
use crate::models::scoring::{Leaderboard, PlayerTally, RecordedAction};
use crate::models::stats::LeaderboardResponse;
use crate::services::scoring_rules_service::ScoringRulesService;

/// Loads period aggregates from the store and hands them to the scoring engine.
pub struct LeaderboardService {
    db: DbPool,
    rules: Arc<ScoringRulesService>,
}

impl LeaderboardService {
    pub fn new(db: DbPool, rules: Arc<ScoringRulesService>) -> Self {
        Self { db, rules }
    }

    pub fn fetch_leaderboard(&self, period: Period) -> AppResult<LeaderboardResponse> {
        let engine = self.rules.engine()?;

        let (total_games, tallies) = self.db.with_connection(|conn| {
            let total_games = StandingsRepository::count_games(conn, &period)?;
            let games_played = StandingsRepository::games_played_by_player(conn, &period)?;

            let mut actions: HashMap<String, Vec<RecordedAction>> = HashMap::new();
            for row in StandingsRepository::action_counts(conn, &period)? {
                let recorded = RecordedAction::from_tag(&row.action_type);
                let repeat = usize::try_from(row.count).unwrap_or(0);
                actions
                    .entry(row.player_id)
                    .or_default()
                    .extend(std::iter::repeat(recorded).take(repeat));
            }

            let tallies = PlayerRepository::list_all(conn)?
                .into_iter()
                .map(|player| PlayerTally {
                    games_played: games_played.get(&player.id).copied().unwrap_or(0),
                    actions: actions.remove(&player.id).unwrap_or_default(),
                    player_id: player.id,
                    player_name: player.name,
                    color: player.color,
                })
                .collect::<Vec<_>>();

            Ok((total_games, tallies))
        })?;

        let leaderboard = engine.build_leaderboard(tallies, total_games);
        info!(
            target: "app::leaderboard",
            start = %period.start_date,
            end = %period.end_date,
            total_games,
            players = leaderboard.len(),
            "leaderboard computed"
        );

        Ok(LeaderboardResponse {
            period,
            total_games,
            leaderboard,
        })
    }

    /// Same as [`fetch_leaderboard`](Self::fetch_leaderboard) but degrades to an
    /// empty board when the store cannot be read.
    pub fn fetch_leaderboard_or_empty(&self, period: Period) -> LeaderboardResponse {
        match self.fetch_leaderboard(period) {
            Ok(response) => response,
            Err(err) => {
                error!(target: "app::leaderboard", error = %err, "leaderboard unavailable, returning empty board");
                LeaderboardResponse {
                    period,
                    total_games: 0,
                    leaderboard: Leaderboard::default(),
                }
            }
        }
    }
}
