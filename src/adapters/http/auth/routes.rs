//! Axum router configuration for authentication endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use crate::adapters::http::AppState;

use super::handlers::{login, logout, me};

/// Authentication routes, mounted at `/api/auth`.
///
/// - `POST /login` - Exchange credentials for a token and session cookie
/// - `POST /logout` - Expire the session cookie
/// - `GET /me` - The caller with its role record
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
}
