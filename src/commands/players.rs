use tracing::debug;

use crate::models::player::{PlayerCreateInput, PlayerRecord, PlayerUpdateInput};

use super::{run_blocking, AppState, CommandResult};

pub async fn players_list(state: &AppState) -> CommandResult<Vec<PlayerRecord>> {
    let app_state = state.clone();
    run_blocking(move || app_state.players().list_players()).await
}

pub async fn players_create(
    state: &AppState,
    payload: PlayerCreateInput,
) -> CommandResult<PlayerRecord> {
    let app_state = state.clone();
    run_blocking(move || app_state.players().create_player(payload)).await
}

pub async fn players_update(
    state: &AppState,
    id: String,
    payload: PlayerUpdateInput,
) -> CommandResult<PlayerRecord> {
    let app_state = state.clone();
    run_blocking(move || app_state.players().update_player(&id, payload)).await
}

pub async fn players_delete(state: &AppState, id: String) -> CommandResult<()> {
    debug!(target: "app::command", player_id = %id, "delete player requested");
    let app_state = state.clone();
    run_blocking(move || app_state.players().delete_player(&id)).await
}
