//! HTTP adapters - REST API implementations.
//!
//! Each domain module has its own HTTP adapter for endpoint exposure.
//! `api_router` composes them under `/api` behind the auth middleware.

pub mod auth;
pub mod courses;
pub mod kolb;
pub mod middleware;
pub mod users;

mod error;
mod state;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

pub use error::ErrorResponse;
pub use state::{AppState, CookieSettings};

use self::auth::auth_routes;
use self::courses::course_routes;
use self::kolb::kolb_routes;
use self::middleware::auth_middleware;
use self::users::user_routes;

/// Full API router with state applied.
///
/// Transport layers (trace, CORS, timeout, request id) are added by the
/// binary so tests can drive this router directly.
pub fn api_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/auth", auth_routes())
        .nest("/users", user_routes())
        .nest("/courses", course_routes())
        .nest("/kolb", kolb_routes());

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(axum::middleware::from_fn_with_state(
            state.sessions.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

/// GET /health
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
