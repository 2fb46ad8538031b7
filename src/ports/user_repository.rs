//! User repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, InstituteId, Role, UserId};
use crate::domain::user::{RoleRecord, User};

/// Persistence for user accounts.
///
/// Role changes and deletions go through `RoleTransitionStore` instead, so the
/// user row and its role record always move together.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user together with its role record (none for ADMIN).
    ///
    /// # Errors
    ///
    /// - `Conflict` with an `email` detail if the email is taken
    /// - `DatabaseError` on persistence failure
    async fn create(&self, user: &User, record: Option<&RoleRecord>) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Lookup by normalised email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Users ordered by last name, optionally filtered by institute and role.
    async fn list(
        &self,
        institute: Option<&InstituteId>,
        role: Option<Role>,
    ) -> Result<Vec<User>, DomainError>;
}
