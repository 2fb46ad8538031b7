//! Axum router configuration for Kolb test endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use crate::adapters::http::AppState;

use super::handlers::{get_kolb_result, submit_kolb_test};

/// Kolb routes, mounted at `/api/kolb`.
///
/// - `POST /` - Submit the caller's answers (STUDENT)
/// - `GET /:student_id` - Latest result for a student
pub fn kolb_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(submit_kolb_test))
        .route("/:student_id", get(get_kolb_result))
}
