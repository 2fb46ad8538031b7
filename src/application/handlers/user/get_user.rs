//! GetUserHandler - Query handler for a single account.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, UserId};
use crate::domain::user::{RoleRecord, User, UserError};
use crate::ports::{RoleRecordRepository, UserRepository};

/// A user together with its role record.
#[derive(Debug, Clone)]
pub struct UserView {
    pub user: User,
    pub record: Option<RoleRecord>,
}

pub struct GetUserHandler {
    users: Arc<dyn UserRepository>,
    records: Arc<dyn RoleRecordRepository>,
}

impl GetUserHandler {
    pub fn new(users: Arc<dyn UserRepository>, records: Arc<dyn RoleRecordRepository>) -> Self {
        Self { users, records }
    }

    /// Users may always read themselves; otherwise ADMIN anywhere and
    /// DIRECTOR inside its institute.
    pub async fn handle(&self, actor: &AuthenticatedUser, user_id: UserId) -> Result<UserView, UserError> {
        if actor.id != user_id && !actor.role.can_manage_users() {
            return Err(UserError::Forbidden);
        }

        let user = self
            .users
            .find_by_id(&user_id)
            .await?
            .ok_or(UserError::NotFound(user_id))?;
        if actor.id != user_id && !actor.can_manage_institute(user.institute_id()) {
            return Err(UserError::Forbidden);
        }

        let record = self.records.find_by_user(&user_id).await?;
        Ok(UserView { user, record })
    }
}
