//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `UserRepository` / `RoleRecordRepository` - Accounts and role records
//! - `CourseRepository` - Courses, sections, contents and enrollment links
//! - `KolbRepository` / `SurveyRepository` - Test results and survey answers
//! - `RoleTransitionStore` - Atomic role changes and account removal
//!
//! ## Security Ports
//!
//! - `SessionValidator` / `TokenIssuer` - Access tokens
//! - `PasswordHasher` - Credential hashing

mod course_repository;
mod kolb_repository;
mod password_hasher;
mod role_record_repository;
mod role_transition_store;
mod session_validator;
mod survey_repository;
mod token_issuer;
mod user_repository;

pub use course_repository::CourseRepository;
pub use kolb_repository::KolbRepository;
pub use password_hasher::PasswordHasher;
pub use role_record_repository::RoleRecordRepository;
pub use role_transition_store::RoleTransitionStore;
pub use session_validator::SessionValidator;
pub use survey_repository::SurveyRepository;
pub use token_issuer::{IssuedToken, TokenIssuer};
pub use user_repository::UserRepository;
