//! Authentication HTTP adapter.

mod handlers;
mod routes;

pub use handlers::{handle_auth_error, session_cookie, AuthApiError, LoginRequest, LoginResponse};
pub use routes::auth_routes;
