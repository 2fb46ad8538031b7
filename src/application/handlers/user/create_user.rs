//! CreateUserHandler - Command handler for registering accounts.

use std::sync::Arc;
use tracing::info;

use crate::domain::foundation::{AuthenticatedUser, InstituteId, Role};
use crate::domain::user::{RoleRecord, User, UserError, MIN_PASSWORD_LENGTH};
use crate::ports::{PasswordHasher, UserRepository};

/// Command to create a user with its role record.
#[derive(Debug, Clone)]
pub struct CreateUserCommand {
    pub institute_id: InstituteId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub role: Role,
}

pub struct CreateUserHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl CreateUserHandler {
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    /// ADMIN creates any role anywhere; DIRECTOR creates teachers and
    /// students inside its own institute.
    pub async fn handle(&self, actor: &AuthenticatedUser, cmd: CreateUserCommand) -> Result<User, UserError> {
        if !actor.can_manage_institute(&cmd.institute_id) {
            return Err(UserError::Forbidden);
        }
        if actor.role == Role::Director && !matches!(cmd.role, Role::Teacher | Role::Student) {
            return Err(UserError::Forbidden);
        }

        if cmd.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(UserError::validation(
                "password",
                format!("must be at least {} characters", MIN_PASSWORD_LENGTH),
            ));
        }
        let password_hash = self
            .hasher
            .hash(&cmd.password)
            .map_err(|e| UserError::infrastructure(e.to_string()))?;

        let user = User::new(
            cmd.institute_id,
            &cmd.email,
            &cmd.first_name,
            &cmd.last_name,
            password_hash,
            cmd.role,
        )?;
        let record = RoleRecord::empty_for(user.role(), *user.id(), *user.institute_id());
        self.users.create(&user, record.as_ref()).await?;

        info!(
            user_id = %user.id(),
            institute_id = %user.institute_id(),
            role = %user.role(),
            created_by = %actor.id,
            "User created"
        );
        Ok(user)
    }
}
