// src/handlers/quiz.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde::Deserialize;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        activity::{ActivityKind, AnswerResult},
        question::{CreateQuestionRequest, Question},
        user::{AnswerResponse, SubmitAnswerRequest},
    },
    scoring::{self, daily, ledger},
    state::AppState,
};

/// Query params for the catalog listing.
#[derive(Debug, Deserialize)]
pub struct ListQuestionsParams {
    pub author: Option<String>,
}

/// Lists the question catalog, newest first.
/// `?author=<id>` narrows the listing to one author's questions.
pub async fn list_questions(
    State(state): State<AppState>,
    Query(params): Query<ListQuestionsParams>,
) -> Result<impl IntoResponse, AppError> {
    let questions = match params.author {
        Some(author) => state.catalog.list_by_author(&author).await?,
        None => state.catalog.list().await?,
    };
    Ok(Json(questions))
}

/// Authors a new question into the catalog.
///
/// Validates the payload and the cross-field invariant that the correct
/// option index points inside the options list. Questions are immutable
/// once created.
pub async fn create_question(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    if payload.correct_option_index >= payload.options.len() {
        return Err(AppError::BadRequest(format!(
            "correctOptionIndex {} out of range for {} options",
            payload.correct_option_index,
            payload.options.len()
        )));
    }

    let question = Question {
        id: uuid::Uuid::new_v4().to_string(),
        text: payload.text,
        options: payload.options,
        correct_option_index: payload.correct_option_index,
        points: payload.points,
        category: payload.category,
        created_by: user_id,
        created_at: Utc::now(),
    };

    state.catalog.insert(&question).await?;

    Ok((StatusCode::CREATED, Json(question)))
}

/// Scores one answer submission.
///
/// * Serializes on the per-user lock, then read-modify-writes the record;
///   without the lock a rapid double-tap could lose an update.
/// * The engine decides whether the answer still scores; repeats only
///   count as attempts.
/// * A daily-mode answer for today's selected question also closes out the
///   daily state.
pub async fn submit_answer(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<SubmitAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let _guard = state.locks.acquire(&user_id).await;

    let record = state
        .profiles
        .get(&user_id)
        .await?
        .ok_or_else(|| AppError::ProfileNotFound(user_id.clone()))?;

    let question = state
        .catalog
        .get(&payload.question_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Question '{}' not found", payload.question_id)))?;

    let now = Utc::now();
    let points_before = record.points;
    let already_completed = record.completed_questions.contains(&payload.question_id);

    let (record, event) =
        scoring::apply_answer(record, &question, payload.selected_index, payload.mode, now)?;

    state.profiles.save(&record).await?;

    if payload.mode == ActivityKind::Daily {
        if let Some(daily_state) = state.profiles.daily_state(&user_id).await? {
            if daily_state.date == now.date_naive()
                && daily_state.question_id == payload.question_id
                && !daily_state.answered
            {
                state
                    .profiles
                    .save_daily_state(&user_id, &daily::mark_answered(daily_state))
                    .await?;
            }
        }
    }

    Ok(Json(AnswerResponse {
        correct: event.result == AnswerResult::Correct,
        already_completed,
        points_awarded: record.points - points_before,
        total_points: record.points,
        streak: record.streak,
    }))
}

/// Whether the user has already answered a question, and how the latest
/// attempt went.
pub async fn answer_status(
    State(state): State<AppState>,
    Path((user_id, question_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let record = state
        .profiles
        .get(&user_id)
        .await?
        .ok_or(AppError::ProfileNotFound(user_id))?;

    let last = ledger::last_event_for(&record.activity_history, &question_id);

    Ok(Json(serde_json::json!({
        "answered": ledger::has_answered(&record.activity_history, &question_id),
        "lastResult": last.map(|event| event.result),
    })))
}

/// Today's question for the user.
///
/// The selection is stable for the whole calendar day; a fresh day (or a
/// selection whose question has since been removed) draws a new one.
pub async fn daily_question(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if state.profiles.get(&user_id).await?.is_none() {
        return Err(AppError::ProfileNotFound(user_id));
    }

    let questions = state.catalog.list().await?;
    let prior = state.profiles.daily_state(&user_id).await?;
    let today = Utc::now().date_naive();

    let selection = daily::select(&questions, prior.clone(), today, rand::random())
        .ok_or_else(|| AppError::NotFound("No questions available".to_string()))?;

    if prior.as_ref() != Some(&selection) {
        state.profiles.save_daily_state(&user_id, &selection).await?;
    }

    let question = questions
        .iter()
        .find(|q| q.id == selection.question_id)
        .cloned()
        .ok_or_else(|| {
            AppError::InternalServerError("daily selection missing from catalog".to_string())
        })?;

    Ok(Json(serde_json::json!({
        "question": question,
        "answeredToday": selection.answered,
    })))
}
