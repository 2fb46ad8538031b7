//! User command and query handlers.

mod change_role;
mod create_user;
mod delete_user;
mod get_user;
mod list_users;

pub use change_role::{ChangeRoleCommand, ChangeRoleHandler};
pub use create_user::{CreateUserCommand, CreateUserHandler};
pub use delete_user::DeleteUserHandler;
pub use get_user::{GetUserHandler, UserView};
pub use list_users::{ListUsersHandler, ListUsersQuery};
