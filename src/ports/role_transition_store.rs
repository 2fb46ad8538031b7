//! Atomic application of role transition plans.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::user::RoleTransitionPlan;

/// Applies a [`RoleTransitionPlan`] as one unit of work.
///
/// # Contract
///
/// - Either every write in the plan lands or none does
/// - The user write only matches a row whose role still equals the plan's
///   expected role; otherwise `ConcurrentModification` (detail `user_id`)
/// - A role record named by `drop_record` that is gone yields
///   `RoleRecordNotFound` (detail `user_id`)
#[async_trait]
pub trait RoleTransitionStore: Send + Sync {
    async fn apply(&self, plan: &RoleTransitionPlan) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_transition_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn RoleTransitionStore) {}
    }
}
