use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{ProvisionUserRequest, UserRecord},
    state::AppState,
};

/// Provisions a profile at account-creation time.
///
/// Scoring never creates records lazily; an identity must come through
/// here first. Returns 409 if the id is already taken.
pub async fn provision_user(
    State(state): State<AppState>,
    Json(payload): Json<ProvisionUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let record = UserRecord::new(payload.id, payload.email, payload.name, Utc::now());
    state.profiles.create(&record).await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// Fetches a user's profile document.
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let record = state
        .profiles
        .get(&user_id)
        .await?
        .ok_or(AppError::ProfileNotFound(user_id))?;

    Ok(Json(record))
}

/// Toggles a question's star for the user.
pub async fn toggle_favorite(
    State(state): State<AppState>,
    Path((user_id, question_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let _guard = state.locks.acquire(&user_id).await;

    let mut record = state
        .profiles
        .get(&user_id)
        .await?
        .ok_or_else(|| AppError::ProfileNotFound(user_id.clone()))?;

    if state.catalog.get(&question_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "Question '{}' not found",
            question_id
        )));
    }

    let was_favorited = record.favorite_questions.iter().any(|id| id == &question_id);
    if was_favorited {
        record.favorite_questions.retain(|id| id != &question_id);
    } else {
        record.favorite_questions.push(question_id);
    }

    state.profiles.save(&record).await?;

    Ok(Json(serde_json::json!({ "favorited": !was_favorited })))
}

/// The user's starred questions, resolved against the catalog. Stars whose
/// question has since been removed are omitted from the response.
pub async fn list_favorites(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let record = state
        .profiles
        .get(&user_id)
        .await?
        .ok_or(AppError::ProfileNotFound(user_id))?;

    let mut favorites = Vec::with_capacity(record.favorite_questions.len());
    for question_id in &record.favorite_questions {
        if let Some(question) = state.catalog.get(question_id).await? {
            favorites.push(question);
        }
    }

    Ok(Json(favorites))
}

/// The user's activity history, newest first.
pub async fn get_activity(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let record = state
        .profiles
        .get(&user_id)
        .await?
        .ok_or(AppError::ProfileNotFound(user_id))?;

    let mut history = record.activity_history;
    history.reverse();

    Ok(Json(history))
}
