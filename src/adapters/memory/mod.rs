//! In-memory adapters.
//!
//! Used by tests and local development without a database.

mod store;

pub use store::InMemoryStore;
