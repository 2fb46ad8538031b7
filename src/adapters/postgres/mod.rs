//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresUserRepository` - Accounts, inserted together with their role record
//! - `PostgresRoleRecordRepository` - Role record lookups
//! - `PostgresCourseRepository` - Courses with JSONB member and section documents
//! - `PostgresKolbRepository` / `PostgresSurveyRepository` - Per-student results
//! - `PostgresRoleTransitionStore` - Role changes and account removal in one transaction

mod course_repository;
mod kolb_repository;
mod role_record_repository;
mod role_transition_store;
mod survey_repository;
mod user_repository;

pub use course_repository::PostgresCourseRepository;
pub use kolb_repository::PostgresKolbRepository;
pub use role_record_repository::PostgresRoleRecordRepository;
pub use role_transition_store::PostgresRoleTransitionStore;
pub use survey_repository::PostgresSurveyRepository;
pub use user_repository::PostgresUserRepository;
