use axum::{Json, extract::State, response::IntoResponse};

use crate::{
    error::AppError, models::user::LeaderboardEntry, scoring::leaderboard, state::AppState,
};

/// Recomputes the leaderboard from every profile, persists the derived
/// ranks, and returns the entries.
///
/// Rank is a cached field, never a source of truth, so it is written back
/// through the store's field-level merge; a concurrent answer submission
/// keeps its counters. Recomputing on unchanged input yields the identical
/// mapping.
pub async fn get_leaderboard(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let records = state.profiles.list().await?;
    let ranked = leaderboard::rank_users(records);

    for record in &ranked {
        state.profiles.save_rank(&record.id, record.rank).await?;
    }

    let entries: Vec<LeaderboardEntry> = ranked.iter().map(LeaderboardEntry::from).collect();
    Ok(Json(entries))
}
