//! DeleteUserHandler - Removes an account and everything tied to it.

use std::sync::Arc;
use tracing::info;

use crate::domain::foundation::{AuthenticatedUser, Role, UserId};
use crate::domain::user::{RoleTransitionPlan, UserError};
use crate::ports::{CourseRepository, RoleRecordRepository, RoleTransitionStore, UserRepository};

use super::change_role::{apply_error, linked_courses};

pub struct DeleteUserHandler {
    users: Arc<dyn UserRepository>,
    records: Arc<dyn RoleRecordRepository>,
    courses: Arc<dyn CourseRepository>,
    store: Arc<dyn RoleTransitionStore>,
}

impl DeleteUserHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        records: Arc<dyn RoleRecordRepository>,
        courses: Arc<dyn CourseRepository>,
        store: Arc<dyn RoleTransitionStore>,
    ) -> Self {
        Self {
            users,
            records,
            courses,
            store,
        }
    }

    /// Deletes the user with the same cascade as leaving its role: a
    /// teacher's courses go, a student's enrollments go.
    ///
    /// Directors may only remove teachers and students of their institute.
    pub async fn handle(&self, actor: &AuthenticatedUser, user_id: UserId) -> Result<(), UserError> {
        if !actor.role.can_manage_users() {
            return Err(UserError::Forbidden);
        }
        if actor.id == user_id {
            return Err(UserError::Forbidden);
        }

        let user = self
            .users
            .find_by_id(&user_id)
            .await?
            .ok_or(UserError::NotFound(user_id))?;
        if !actor.can_manage_institute(user.institute_id()) {
            return Err(UserError::Forbidden);
        }
        if actor.role == Role::Director && !matches!(user.role(), Role::Teacher | Role::Student) {
            return Err(UserError::Forbidden);
        }

        let record = self.records.find_by_user(user.id()).await?;
        let linked = linked_courses(self.courses.as_ref(), &user).await?;
        let plan = RoleTransitionPlan::removal(&user, record.as_ref(), &linked)?;
        self.store
            .apply(&plan)
            .await
            .map_err(|e| apply_error(&user, e))?;

        info!(
            user_id = %user.id(),
            role = %user.role(),
            courses_deleted = plan.delete_courses.len(),
            courses_unenrolled = plan.unenroll_from.len(),
            deleted_by = %actor.id,
            "User deleted"
        );
        Ok(())
    }
}
