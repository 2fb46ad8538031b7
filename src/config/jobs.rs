//! Background job configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct JobsConfig {
    /// Seconds between scheduled-content visibility sweeps
    #[serde(default = "default_visibility_interval")]
    pub visibility_interval_secs: u64,
}

impl JobsConfig {
    pub fn visibility_interval(&self) -> Duration {
        Duration::from_secs(self.visibility_interval_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.visibility_interval_secs == 0 {
            return Err(ValidationError::InvalidJobInterval);
        }
        Ok(())
    }
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            visibility_interval_secs: default_visibility_interval(),
        }
    }
}

fn default_visibility_interval() -> u64 {
    60
}
