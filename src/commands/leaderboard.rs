use crate::models::stats::{LeaderboardResponse, PlayerStatsResponse};

use super::{run_blocking, AppState, CommandResult, PeriodParams};

/// Leaderboard for the requested period. Malformed bounds are rejected; a
/// store failure yields an empty board instead of an error.
pub async fn leaderboard_fetch(
    state: &AppState,
    params: Option<PeriodParams>,
) -> CommandResult<LeaderboardResponse> {
    let app_state = state.clone();
    let period = params.unwrap_or_default().resolve()?;
    run_blocking(move || Ok(app_state.leaderboard().fetch_leaderboard_or_empty(period))).await
}

pub async fn player_stats_fetch(
    state: &AppState,
    player_id: String,
    params: Option<PeriodParams>,
) -> CommandResult<PlayerStatsResponse> {
    let app_state = state.clone();
    let period = params.unwrap_or_default().resolve()?;
    run_blocking(move || {
        app_state
            .player_stats()
            .fetch_player_stats(&player_id, period)
    })
    .await
}
