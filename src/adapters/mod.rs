//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - JWT token service and argon2 password hashing
//! - `http` - axum REST API
//! - `jobs` - Background tasks (scheduled content visibility)
//! - `memory` - In-memory store for tests and local runs
//! - `postgres` - PostgreSQL repositories

pub mod auth;
pub mod http;
pub mod jobs;
pub mod memory;
pub mod postgres;

pub use jobs::{VisibilityScheduler, VisibilitySchedulerConfig};
