//! HTTP surface of the portal.
//!
//! Each endpoint keeps the request/response shape the browser client
//! already speaks (see [`wire`]); handlers stay thin and delegate to the
//! [`crate::db`] helpers.

use std::sync::Arc;

use argon2::Argon2;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{db::DbPool, error::ApiError};

pub mod auth;
pub mod engagement;
pub mod messages;
pub mod posts;
pub mod reports;
pub mod students;
pub mod wire;

/// Shared state threaded through every request handler.
pub struct AppState {
    pub pool: DbPool,
    pub argon2: Arc<Argon2<'static>>,
}

impl AppState {
    #[must_use]
    pub fn new(pool: DbPool, argon2: Arc<Argon2<'static>>) -> Self { Self { pool, argon2 } }
}

/// Assemble the portal router with CORS and request tracing applied.
///
/// The client is served from arbitrary origins, so CORS stays permissive
/// and pre-flight `OPTIONS` requests succeed on every route.
#[must_use]
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    Router::new()
        .route(
            "/api/save_post",
            post(posts::save_post).fallback(invalid_method),
        )
        .route(
            "/api/get_posts",
            get(posts::get_posts).fallback(invalid_method),
        )
        .route(
            "/api/update_post_engagement",
            post(engagement::update_post_engagement).fallback(invalid_method),
        )
        .route(
            "/api/delete_post",
            post(posts::delete_post).fallback(invalid_method),
        )
        .route("/api/login", post(auth::login).fallback(invalid_method))
        .route("/api/register", post(auth::register).fallback(invalid_method))
        .route(
            "/api/update_student_password",
            post(auth::update_student_password).fallback(invalid_method),
        )
        .route(
            "/api/update_admin_password",
            post(auth::update_admin_password).fallback(invalid_method),
        )
        .route(
            "/api/get_students",
            get(students::get_students).fallback(invalid_method),
        )
        .route(
            "/api/search_students",
            get(students::search_students).fallback(invalid_method),
        )
        .route(
            "/api/update_student",
            post(students::update_student).fallback(invalid_method),
        )
        .route(
            "/api/archive_student",
            post(students::archive_student).fallback(invalid_method),
        )
        .route(
            "/api/delete_student",
            post(students::delete_student).fallback(invalid_method),
        )
        .route(
            "/api/get_messages",
            get(messages::get_messages).fallback(invalid_method),
        )
        .route(
            "/api/save_message",
            post(messages::save_message).fallback(invalid_method),
        )
        .route(
            "/api/report_summary",
            get(reports::report_summary).fallback(invalid_method),
        )
        .fallback(unknown_endpoint)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn invalid_method() -> ApiError { ApiError::InvalidRequestMethod }

async fn unknown_endpoint() -> ApiError { ApiError::NotFound("Unknown endpoint".to_owned()) }
