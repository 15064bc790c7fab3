pub mod games;
pub mod leaderboard;
pub mod players;
pub mod settings;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{error, warn};

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::period::Period;
use crate::services::game_service::GameService;
use crate::services::leaderboard_service::LeaderboardService;
use crate::services::player_service::PlayerService;
use crate::services::player_stats_service::PlayerStatsService;
use crate::services::scoring_rules_service::ScoringRulesService;

#[derive(Clone)]
pub struct AppState {
    db_pool: DbPool,
    player_service: Arc<PlayerService>,
    game_service: Arc<GameService>,
    scoring_rules_service: Arc<ScoringRulesService>,
    leaderboard_service: Arc<LeaderboardService>,
    player_stats_service: Arc<PlayerStatsService>,
}

impl AppState {
    pub fn new(db_pool: DbPool) -> Self {
        let player_service = Arc::new(PlayerService::new(db_pool.clone()));
        let game_service = Arc::new(GameService::new(db_pool.clone()));
        let scoring_rules_service = Arc::new(ScoringRulesService::new(db_pool.clone()));
        let leaderboard_service = Arc::new(LeaderboardService::new(
            db_pool.clone(),
            Arc::clone(&scoring_rules_service),
        ));
        let player_stats_service = Arc::new(PlayerStatsService::new(
            db_pool.clone(),
            Arc::clone(&scoring_rules_service),
        ));

        Self {
            db_pool,
            player_service,
            game_service,
            scoring_rules_service,
            leaderboard_service,
            player_stats_service,
        }
    }

    pub fn players(&self) -> Arc<PlayerService> {
        Arc::clone(&self.player_service)
    }

    pub fn games(&self) -> Arc<GameService> {
        Arc::clone(&self.game_service)
    }

    pub fn scoring_rules(&self) -> Arc<ScoringRulesService> {
        Arc::clone(&self.scoring_rules_service)
    }

    pub fn leaderboard(&self) -> Arc<LeaderboardService> {
        Arc::clone(&self.leaderboard_service)
    }

    pub fn player_stats(&self) -> Arc<PlayerStatsService> {
        Arc::clone(&self.player_stats_service)
    }

    pub fn db(&self) -> DbPool {
        self.db_pool.clone()
    }
}

/// Optional period bounds as sent by a caller. Both must be present to take
/// effect, otherwise the current month is used.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PeriodParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl PeriodParams {
    pub fn resolve(&self) -> AppResult<Period> {
        Period::resolve(
            self.start_date.as_deref(),
            self.end_date.as_deref(),
            chrono::Local::now().date_naive(),
        )
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<JsonValue>,
}

impl CommandError {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Option<JsonValue>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details,
        }
    }
}

impl From<AppError> for CommandError {
    fn from(error: AppError) -> Self {
        match error {
            AppError::Validation {
                message, details, ..
            } => CommandError::new("VALIDATION_ERROR", message, details),
            AppError::NotFound => {
                CommandError::new("NOT_FOUND", "the requested record does not exist", None)
            }
            AppError::Conflict { message } => CommandError::new("CONFLICT", message, None),
            AppError::Database { message } => {
                error!(target: "app::command", %message, "database error in command");
                CommandError::new("DATABASE_ERROR", message, None)
            }
            AppError::Serialization(error) => {
                error!(target: "app::command", error = %error, "serialization error in command");
                CommandError::new("UNKNOWN", "serialization failed", None)
            }
            AppError::Yaml(error) => {
                warn!(target: "app::command", error = %error, "rule file error in command");
                CommandError::new("VALIDATION_ERROR", error.to_string(), None)
            }
            AppError::Io(error) => {
                error!(target: "app::command", error = %error, "io error in command");
                CommandError::new("UNKNOWN", "file system access failed", None)
            }
            AppError::Other(message) => {
                error!(target: "app::command", %message, "unexpected error in command");
                CommandError::new("UNKNOWN", message, None)
            }
        }
    }
}

pub(crate) async fn run_blocking<T: Send + 'static>(
    task: impl FnOnce() -> Result<T, AppError> + Send + 'static,
) -> CommandResult<T> {
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| CommandError::new("UNKNOWN", format!("command task failed: {err}"), None))?
        .map_err(CommandError::from)
}
