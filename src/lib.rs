pub mod commands;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

use std::path::Path;

use tracing::{info, warn};

use crate::commands::AppState;
use crate::db::DbPool;
use crate::error::AppResult;

const DATABASE_FILE: &str = "scoreboard.sqlite";
const RULES_FILE: &str = "scoring_rules.yaml";
const LOG_DIR: &str = "logs";

/// Prepares `data_dir` and returns the shared state behind every command.
///
/// Logging goes to `data_dir/logs`. When `data_dir/scoring_rules.yaml`
/// exists its weight table replaces the stored scoring rules.
pub fn bootstrap(data_dir: &Path) -> AppResult<AppState> {
    std::fs::create_dir_all(data_dir)?;
    if let Err(err) = utils::logger::init_logging(&data_dir.join(LOG_DIR)) {
        warn!(target: "app::bootstrap", error = %err, "logging unavailable, continuing without it");
    }

    let pool = DbPool::new(data_dir.join(DATABASE_FILE))?;
    let state = AppState::new(pool);

    let rules_path = data_dir.join(RULES_FILE);
    if rules_path.is_file() {
        let raw = std::fs::read_to_string(&rules_path)?;
        let rules = state.scoring_rules().load_yaml(&raw)?;
        info!(
            target: "app::scoring",
            path = %rules_path.display(),
            preset = rules.preset.as_str(),
            "scoring rules loaded from file"
        );
    }

    info!(target: "app::bootstrap", data_dir = %data_dir.display(), "scoreboard ready");
    Ok(state)
}
