//! Authentication adapters.
//!
//! - `jwt` - HS256 token service implementing `SessionValidator` and `TokenIssuer`
//! - `current_user` - Wraps a token validator and reloads the caller's user row
//! - `argon2_hasher` - `PasswordHasher` backed by argon2id
//! - `mock` - Fixed-token validator for tests

mod argon2_hasher;
mod current_user;
mod jwt;
mod mock;

pub use argon2_hasher::Argon2PasswordHasher;
pub use current_user::CurrentUserValidator;
pub use jwt::JwtTokenService;
pub use mock::MockSessionValidator;
