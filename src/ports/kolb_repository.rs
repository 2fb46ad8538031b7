//! Kolb submission repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::kolb::KolbSubmission;

#[async_trait]
pub trait KolbRepository: Send + Sync {
    /// Store the submission, replacing any earlier one for the student, and
    /// record its profile on the student record in the same atomic unit.
    ///
    /// # Errors
    ///
    /// - `RoleRecordNotFound` if the student has no student record
    async fn upsert(&self, submission: &KolbSubmission) -> Result<(), DomainError>;

    async fn find_by_student(&self, student: &UserId) -> Result<Option<KolbSubmission>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kolb_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn KolbRepository) {}
    }
}
