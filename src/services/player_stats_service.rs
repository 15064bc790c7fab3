use std::sync::Arc;

use tracing::debug;

use crate::db::repositories::player_repository::PlayerRepository;
use crate::db::repositories::standings_repository::StandingsRepository;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::period::Period;
use crate::models::scoring::{ActionCounts, RecordedAction};
use crate::models::stats::{ActionPoints, GameBreakdownEntry, PlayerStatsResponse};
use crate::services::scoring_engine::absence_rate;
use crate::services::scoring_rules_service::ScoringRulesService;

/// Per-player view of a period: totals plus a game-by-game breakdown valued
/// with the same weight table as the leaderboard.
pub struct PlayerStatsService {
    db: DbPool,
    rules: Arc<ScoringRulesService>,
}

impl PlayerStatsService {
    pub fn new(db: DbPool, rules: Arc<ScoringRulesService>) -> Self {
        Self { db, rules }
    }

    pub fn fetch_player_stats(
        &self,
        player_id: &str,
        period: Period,
    ) -> AppResult<PlayerStatsResponse> {
        let engine = self.rules.engine()?;

        let (player, total_games, games_played, counts, games) =
            self.db.with_connection(|conn| {
                let player = PlayerRepository::find_by_id(conn, player_id)?
                    .ok_or_else(AppError::not_found)?
                    .into_record();
                let total_games = StandingsRepository::count_games(conn, &period)?;
                let games_played = StandingsRepository::games_played(conn, player_id, &period)?;
                let counts =
                    StandingsRepository::action_counts_for_player(conn, player_id, &period)?;
                let games = StandingsRepository::player_games(conn, player_id, &period)?;
                Ok((player, total_games, games_played, counts, games))
            })?;

        let mut actions = Vec::new();
        for row in counts {
            let recorded = RecordedAction::from_tag(&row.action_type);
            let repeat = usize::try_from(row.count).unwrap_or(0);
            actions.extend(std::iter::repeat(recorded).take(repeat));
        }

        let game_breakdown = games
            .into_iter()
            .map(|game| GameBreakdownEntry {
                game_id: game.game_id,
                game_date: game.game_date,
                actions: game
                    .action_types
                    .into_iter()
                    .map(|action_type| {
                        let points = RecordedAction::from_tag(&action_type)
                            .kind()
                            .map(|kind| engine.weights().weight(kind))
                            .unwrap_or(0);
                        ActionPoints {
                            action_type,
                            points,
                        }
                    })
                    .collect(),
            })
            .collect::<Vec<_>>();

        let total_points = engine.compute_player_points(&actions, total_games, games_played);
        debug!(
            target: "app::stats",
            player_id = %player.id,
            total_games,
            games_played,
            total_points,
            "player stats computed"
        );

        Ok(PlayerStatsResponse {
            stats: ActionCounts::from_actions(&actions),
            absence_rate: absence_rate(total_games, games_played),
            total_points,
            player,
            period,
            total_games,
            games_played,
            game_breakdown,
        })
    }
}
