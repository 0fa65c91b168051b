// src/routes.rs

use axum::{
    Router,
    http::Method,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{leaderboard, profile, quiz},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (questions, users, leaderboard).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (stores and per-user write locks).
///
/// Identity arrives as the opaque user id in the path; authentication is
/// the upstream identity provider's business.
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let question_routes = Router::new().route("/", get(quiz::list_questions));

    let user_routes = Router::new()
        .route("/", post(profile::provision_user))
        .route("/{id}", get(profile::get_profile))
        .route("/{id}/answers", post(quiz::submit_answer))
        .route("/{id}/answers/{question_id}", get(quiz::answer_status))
        .route("/{id}/activity", get(profile::get_activity))
        .route("/{id}/favorites", get(profile::list_favorites))
        .route("/{id}/favorites/{question_id}", post(profile::toggle_favorite))
        .route("/{id}/daily", get(quiz::daily_question))
        .route("/{id}/questions", post(quiz::create_question));

    let leaderboard_routes = Router::new().route("/", get(leaderboard::get_leaderboard));

    Router::new()
        .nest("/api/questions", question_routes)
        .nest("/api/users", user_routes)
        .nest("/api/leaderboard", leaderboard_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
