//! HTTP DTOs for user endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::UserView;
use crate::domain::foundation::{InstituteId, Role, Timestamp, UserId};
use crate::domain::user::{RoleRecord, User};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    /// Defaults to the caller's institute.
    #[serde(default)]
    pub institute_id: Option<InstituteId>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListUsersParams {
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub institute_id: Option<InstituteId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeRoleRequest {
    pub role: Role,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Public view of an account; never carries the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub institute_id: InstituteId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id(),
            institute_id: *user.institute_id(),
            email: user.email().to_string(),
            first_name: user.first_name().to_string(),
            last_name: user.last_name().to_string(),
            role: user.role(),
            created_at: *user.created_at(),
            updated_at: *user.updated_at(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserDetailResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub record: Option<RoleRecord>,
}

impl From<UserView> for UserDetailResponse {
    fn from(view: UserView) -> Self {
        Self {
            user: UserResponse::from(&view.user),
            record: view.record,
        }
    }
}
