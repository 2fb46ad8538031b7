//! Axum router configuration for user endpoints.

use axum::{
    routing::{get, patch},
    Router,
};

use crate::adapters::http::AppState;

use super::handlers::{change_role, create_user, delete_user, get_user, list_users};

/// User routes, mounted at `/api/users`.
///
/// - `POST /` - Create a user with its role record
/// - `GET /` - List users (`?role=`, `?institute_id=` for ADMIN)
/// - `GET /:id` - User with its role record
/// - `DELETE /:id` - Remove a user and cascade its courses or enrollments
/// - `PATCH /:id/role` - Promote or demote
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).delete(delete_user))
        .route("/:id/role", patch(change_role))
}
