//! Learning profile enum.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// One of the four Kolb learning styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LearningProfile {
    Divergent,
    Assimilator,
    Accommodator,
    Convergent,
}

impl LearningProfile {
    pub const ALL: [LearningProfile; 4] = [
        LearningProfile::Divergent,
        LearningProfile::Assimilator,
        LearningProfile::Accommodator,
        LearningProfile::Convergent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LearningProfile::Divergent => "DIVERGENT",
            LearningProfile::Assimilator => "ASSIMILATOR",
            LearningProfile::Accommodator => "ACCOMMODATOR",
            LearningProfile::Convergent => "CONVERGENT",
        }
    }
}

impl fmt::Display for LearningProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LearningProfile {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LearningProfile::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                ValidationError::invalid_format("learning_profile", format!("unknown profile '{}'", s))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_roundtrips_through_str() {
        for profile in LearningProfile::ALL {
            assert_eq!(profile.as_str().parse::<LearningProfile>().unwrap(), profile);
        }
    }

    #[test]
    fn json_uses_upper_case_names() {
        assert_eq!(
            serde_json::to_string(&LearningProfile::Accommodator).unwrap(),
            "\"ACCOMMODATOR\""
        );
    }
}
