//! LoginHandler - Exchanges credentials for an access token.

use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::foundation::AuthError;
use crate::domain::user::{normalize_email, User};
use crate::ports::{IssuedToken, PasswordHasher, TokenIssuer, UserRepository};

#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct LoginResult {
    pub token: IssuedToken,
    pub user: User,
}

pub struct LoginHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenIssuer>,
}

impl LoginHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self { users, hasher, tokens }
    }

    /// Unknown emails and wrong passwords both yield `InvalidCredentials`.
    pub async fn handle(&self, cmd: LoginCommand) -> Result<LoginResult, AuthError> {
        let email = normalize_email(&cmd.email).map_err(|_| AuthError::InvalidCredentials)?;
        let user = self
            .users
            .find_by_email(&email)
            .await
            .map_err(|e| AuthError::service_unavailable(e.to_string()))?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.hasher.verify(&cmd.password, user.password_hash())? {
            warn!(user_id = %user.id(), "Login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user)?;
        info!(user_id = %user.id(), role = %user.role(), "User logged in");
        Ok(LoginResult { token, user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::test_support::{seed_user, PlainHasher};
    use crate::domain::foundation::{InstituteId, Role, Timestamp};

    struct FixedIssuer;

    impl TokenIssuer for FixedIssuer {
        fn issue(&self, user: &User) -> Result<IssuedToken, AuthError> {
            Ok(IssuedToken {
                token: format!("token-for-{}", user.id()),
                expires_at: Timestamp::now().plus_secs(self.ttl_secs()),
            })
        }

        fn ttl_secs(&self) -> i64 {
            3600
        }
    }

    fn handler(store: &InMemoryStore) -> LoginHandler {
        LoginHandler::new(Arc::new(store.clone()), Arc::new(PlainHasher), Arc::new(FixedIssuer))
    }

    fn cmd(email: &str, password: &str) -> LoginCommand {
        LoginCommand {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn valid_credentials_issue_token() {
        let store = InMemoryStore::new();
        let user = seed_user(&store, "Sam", Role::Student, InstituteId::new()).await;

        let result = handler(&store)
            .handle(cmd("SAM@school.test", "correct horse"))
            .await
            .unwrap();
        assert_eq!(result.user.id(), user.id());
        assert_eq!(result.token.token, format!("token-for-{}", user.id()));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let store = InMemoryStore::new();
        seed_user(&store, "Sam", Role::Student, InstituteId::new()).await;
        let handler = handler(&store);

        let wrong = handler.handle(cmd("sam@school.test", "battery staple")).await;
        let unknown = handler.handle(cmd("nobody@school.test", "correct horse")).await;
        let malformed = handler.handle(cmd("not-an-email", "correct horse")).await;
        for result in [wrong, unknown, malformed] {
            assert_eq!(result.unwrap_err(), AuthError::InvalidCredentials);
        }
    }
}
