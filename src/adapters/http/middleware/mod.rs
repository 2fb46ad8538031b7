//! HTTP middleware for axum.
//!
//! - `auth` - Authentication middleware and extractors

pub mod auth;

pub use auth::{auth_middleware, extract_token, AuthRejection, AuthState, RequireAuth, ACCESS_TOKEN_COOKIE};
