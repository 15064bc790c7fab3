use crate::models::game::{GameRecord, GameUpsertInput};

use super::{run_blocking, AppState, CommandResult, PeriodParams};

/// Lists games newest first. Without params the whole history is returned.
pub async fn games_list(
    state: &AppState,
    params: Option<PeriodParams>,
) -> CommandResult<Vec<GameRecord>> {
    let app_state = state.clone();
    let period = match params {
        Some(params) => Some(params.resolve()?),
        None => None,
    };
    run_blocking(move || app_state.games().list_games(period.as_ref())).await
}

pub async fn games_get(state: &AppState, id: String) -> CommandResult<GameRecord> {
    let app_state = state.clone();
    run_blocking(move || app_state.games().get_game(&id)).await
}

pub async fn games_create(state: &AppState, payload: GameUpsertInput) -> CommandResult<GameRecord> {
    let app_state = state.clone();
    run_blocking(move || app_state.games().create_game(payload)).await
}

pub async fn games_update(
    state: &AppState,
    id: String,
    payload: GameUpsertInput,
) -> CommandResult<GameRecord> {
    let app_state = state.clone();
    run_blocking(move || app_state.games().update_game(&id, payload)).await
}

pub async fn games_delete(state: &AppState, id: String) -> CommandResult<()> {
    let app_state = state.clone();
    run_blocking(move || app_state.games().delete_game(&id)).await
}
