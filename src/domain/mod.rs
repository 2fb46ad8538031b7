//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, roles, timestamps, errors)
//! - `user` - Accounts, role records and role transitions
//! - `course` - Courses, sections and contents
//! - `kolb` - Kolb learning-style test and classifier
//! - `survey` - Course satisfaction surveys

pub mod course;
pub mod foundation;
pub mod kolb;
pub mod survey;
pub mod user;
