use crate::models::settings::{ScoringRules, ScoringRulesUpdate};

use super::{run_blocking, AppState, CommandResult};

pub async fn scoring_rules_get(state: &AppState) -> CommandResult<ScoringRules> {
    let app_state = state.clone();
    run_blocking(move || app_state.scoring_rules().get()).await
}

pub async fn scoring_rules_update(
    state: &AppState,
    payload: ScoringRulesUpdate,
) -> CommandResult<ScoringRules> {
    let app_state = state.clone();
    run_blocking(move || app_state.scoring_rules().update(payload)).await
}
