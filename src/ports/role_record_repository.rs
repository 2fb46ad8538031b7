//! Role record lookup port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::user::RoleRecord;

/// Read access to role records.
///
/// Writes happen inside user creation, enrollment, Kolb submission and role
/// transitions, each in its own atomic unit.
#[async_trait]
pub trait RoleRecordRepository: Send + Sync {
    /// The role record of `user_id`, if any.
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<RoleRecord>, DomainError>;
}
