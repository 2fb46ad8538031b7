//! Session validator that checks token claims against the stored user.
//!
//! Token claims are a snapshot taken at login. Every request reloads the
//! user so a role change takes effect on the next call and a deleted
//! account stops authenticating immediately, whatever the token's expiry.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::ports::{SessionValidator, UserRepository};

/// Wraps a token validator and replaces its claims with the current user row.
pub struct CurrentUserValidator {
    tokens: Arc<dyn SessionValidator>,
    users: Arc<dyn UserRepository>,
}

impl CurrentUserValidator {
    pub fn new(tokens: Arc<dyn SessionValidator>, users: Arc<dyn UserRepository>) -> Self {
        Self { tokens, users }
    }
}

#[async_trait]
impl SessionValidator for CurrentUserValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let claimed = self.tokens.validate(token).await?;

        let user = self
            .users
            .find_by_id(&claimed.id)
            .await
            .map_err(|e| AuthError::service_unavailable(format!("user lookup failed: {}", e)))?
            .ok_or_else(|| {
                tracing::debug!(user_id = %claimed.id, "Token for a deleted user");
                AuthError::InvalidToken
            })?;

        if user.role() != claimed.role {
            tracing::debug!(
                user_id = %claimed.id,
                token_role = %claimed.role,
                current_role = %user.role(),
                "Token role is stale, using current role"
            );
        }

        Ok(AuthenticatedUser::new(
            *user.id(),
            user.email(),
            user.role(),
            *user.institute_id(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockSessionValidator;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::foundation::{InstituteId, Role};
    use crate::domain::user::{RoleRecord, RoleTransitionPlan, User};
    use crate::ports::{RoleRecordRepository, RoleTransitionStore};

    async fn seeded(role: Role) -> (Arc<InMemoryStore>, User) {
        let store = Arc::new(InMemoryStore::new());
        let user = User::new(InstituteId::new(), "t@school.test", "T", "T", "hash".into(), role).unwrap();
        let record = RoleRecord::empty_for(role, *user.id(), *user.institute_id());
        UserRepository::create(store.as_ref(), &user, record.as_ref()).await.unwrap();
        (store, user)
    }

    fn claims_for(user: &User) -> AuthenticatedUser {
        AuthenticatedUser::new(*user.id(), user.email(), user.role(), *user.institute_id())
    }

    #[tokio::test]
    async fn unchanged_user_keeps_claims() {
        let (store, user) = seeded(Role::Teacher).await;
        let tokens = MockSessionValidator::new().with_user("tok", claims_for(&user));
        let validator = CurrentUserValidator::new(Arc::new(tokens), store);

        let caller = validator.validate("tok").await.unwrap();
        assert_eq!(caller, claims_for(&user));
    }

    #[tokio::test]
    async fn role_change_overrides_token_role() {
        let (store, teacher) = seeded(Role::Teacher).await;
        let tokens = MockSessionValidator::new().with_user("tok", claims_for(&teacher));
        let validator = CurrentUserValidator::new(Arc::new(tokens), store.clone());

        let record = store.find_by_user(teacher.id()).await.unwrap();
        let plan = RoleTransitionPlan::role_change(&teacher, record.as_ref(), Role::Student, &[]).unwrap();
        store.apply(&plan).await.unwrap();

        let caller = validator.validate("tok").await.unwrap();
        assert_eq!(caller.role, Role::Student);
        assert_eq!(caller.id, *teacher.id());
    }

    #[tokio::test]
    async fn deleted_user_token_is_invalid() {
        let (store, student) = seeded(Role::Student).await;
        let tokens = MockSessionValidator::new().with_user("tok", claims_for(&student));
        let validator = CurrentUserValidator::new(Arc::new(tokens), store.clone());

        let record = store.find_by_user(student.id()).await.unwrap();
        let plan = RoleTransitionPlan::removal(&student, record.as_ref(), &[]).unwrap();
        store.apply(&plan).await.unwrap();

        assert_eq!(validator.validate("tok").await, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn token_errors_pass_through() {
        let (store, _) = seeded(Role::Student).await;
        let tokens = MockSessionValidator::new().with_error(AuthError::TokenExpired);
        let validator = CurrentUserValidator::new(Arc::new(tokens), store);

        assert_eq!(validator.validate("old").await, Err(AuthError::TokenExpired));
    }
}
