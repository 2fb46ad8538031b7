//! HTTP handlers for login, logout and the current caller.

use axum::extract::{Json, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::adapters::http::error::log_if_internal;
use crate::adapters::http::middleware::{RequireAuth, ACCESS_TOKEN_COOKIE};
use crate::adapters::http::users::{UserApiError, UserDetailResponse, UserResponse};
use crate::adapters::http::{AppState, CookieSettings, ErrorResponse};
use crate::application::handlers::LoginCommand;
use crate::domain::foundation::{AuthError, Timestamp};

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: Timestamp,
    pub user: UserResponse,
}

/// `Set-Cookie` value carrying `token` for `max_age_secs`.
pub fn session_cookie(token: &str, max_age_secs: i64, settings: CookieSettings) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        ACCESS_TOKEN_COOKIE,
        token,
        max_age_secs.max(0)
    );
    if settings.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, AuthApiError> {
    let result = state
        .login_handler()
        .handle(LoginCommand {
            email: request.email,
            password: request.password,
        })
        .await?;

    let cookie = session_cookie(&result.token.token, state.tokens.ttl_secs(), state.cookie);
    let cookie = HeaderValue::from_str(&cookie)
        .map_err(|e| AuthError::service_unavailable(format!("unencodable cookie: {}", e)))?;
    let body = LoginResponse {
        token: result.token.token,
        expires_at: result.token.expires_at,
        user: UserResponse::from(&result.user),
    };

    Ok(([(header::SET_COOKIE, cookie)], Json(body)).into_response())
}

/// POST /api/auth/logout - Expires the session cookie.
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let cookie = session_cookie("", 0, state.cookie);
    (StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)])
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
) -> Result<impl IntoResponse, UserApiError> {
    let view = state.get_user_handler().handle(&actor, actor.id).await?;
    Ok(Json(UserDetailResponse::from(view)))
}

/// API error type that converts auth errors to HTTP responses.
#[derive(Debug)]
pub struct AuthApiError(pub AuthError);

impl From<AuthError> for AuthApiError {
    fn from(err: AuthError) -> Self {
        Self(err)
    }
}

pub fn handle_auth_error(err: &AuthError) -> (StatusCode, &'static str) {
    match err {
        AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
        AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
        AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED"),
        AuthError::ServiceUnavailable(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    }
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let (status, code) = handle_auth_error(&self.0);
        let message = self.0.to_string();
        log_if_internal(status, &message);
        ErrorResponse::new(code, message).into_response_with(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_has_required_attributes() {
        let cookie = session_cookie("abc", 3600, CookieSettings { secure: false });
        assert_eq!(cookie, "access_token=abc; HttpOnly; SameSite=Lax; Path=/; Max-Age=3600");
    }

    #[test]
    fn secure_flag_is_appended_when_configured() {
        let cookie = session_cookie("abc", 60, CookieSettings { secure: true });
        assert!(cookie.ends_with("; Secure"));
    }

    #[test]
    fn logout_cookie_expires_immediately() {
        let cookie = session_cookie("", 0, CookieSettings { secure: false });
        assert!(cookie.starts_with("access_token=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn wrong_credentials_map_to_401() {
        let response = AuthApiError(AuthError::InvalidCredentials).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
