//! Background jobs.

mod visibility_scheduler;

pub use visibility_scheduler::{VisibilityScheduler, VisibilitySchedulerConfig};
