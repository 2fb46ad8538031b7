//! Mock session validator for testing.
//!
//! Maps fixed tokens to callers so HTTP tests can authenticate without
//! signing real JWTs.
//!
//! ```ignore
//! let validator = MockSessionValidator::new()
//!     .with_user("director-token", director.clone());
//! let caller = validator.validate("director-token").await?;
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::ports::SessionValidator;

/// Tokens not in the map return `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockSessionValidator {
    tokens: RwLock<HashMap<String, AuthenticatedUser>>,
    /// Returned for every validation when set.
    force_error: RwLock<Option<AuthError>>,
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.add_token(token, user);
        self
    }

    pub fn with_error(self, error: AuthError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }

    pub fn add_token(&self, token: impl Into<String>, user: AuthenticatedUser) {
        self.tokens.write().unwrap().insert(token.into(), user);
    }

    pub fn remove_token(&self, token: &str) {
        self.tokens.write().unwrap().remove(token);
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if let Some(error) = self.force_error.read().unwrap().clone() {
            return Err(error);
        }
        self.tokens
            .read()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{InstituteId, Role, UserId};

    fn caller() -> AuthenticatedUser {
        AuthenticatedUser::new(UserId::new(), "s@school.test", Role::Student, InstituteId::new())
    }

    #[tokio::test]
    async fn known_token_returns_user_until_removed() {
        let user = caller();
        let validator = MockSessionValidator::new().with_user("tok", user.clone());

        assert_eq!(validator.validate("tok").await.unwrap(), user);
        validator.remove_token("tok");
        assert_eq!(validator.validate("tok").await, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn forced_error_wins() {
        let validator = MockSessionValidator::new()
            .with_user("tok", caller())
            .with_error(AuthError::TokenExpired);

        assert_eq!(validator.validate("tok").await, Err(AuthError::TokenExpired));
    }
}
