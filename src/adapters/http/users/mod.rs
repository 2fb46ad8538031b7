//! User HTTP adapter.

mod dto;
mod handlers;
mod routes;

pub use dto::{ChangeRoleRequest, CreateUserRequest, ListUsersParams, UserDetailResponse, UserResponse};
pub use handlers::{handle_user_error, UserApiError};
pub use routes::user_routes;
