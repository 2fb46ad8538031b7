//! Role enum and its transition table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::state_machine::StateMachine;
use super::ValidationError;

/// Role a user holds inside its institute.
///
/// Transitions between roles are promotion/demotion moves governed by
/// [`StateMachine`]:
///
/// | From     | To                 |
/// |----------|--------------------|
/// | Student  | Teacher            |
/// | Teacher  | Student, Director  |
/// | Director | (none)             |
/// | Admin    | (none)             |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Director,
    Teacher,
    Student,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Director, Role::Teacher, Role::Student];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Director => "DIRECTOR",
            Role::Teacher => "TEACHER",
            Role::Student => "STUDENT",
        }
    }

    /// ADMIN and DIRECTOR may manage users.
    pub fn can_manage_users(&self) -> bool {
        matches!(self, Role::Admin | Role::Director)
    }

    /// Whether this role carries a role-specific record.
    pub fn has_record(&self) -> bool {
        !matches!(self, Role::Admin)
    }
}

impl StateMachine for Role {
    fn can_transition_to(&self, target: &Self) -> bool {
        use Role::*;
        matches!(
            (self, target),
            (Student, Teacher) | (Teacher, Student) | (Teacher, Director)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use Role::*;
        match self {
            Student => vec![Teacher],
            Teacher => vec![Student, Director],
            Director | Admin => vec![],
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "DIRECTOR" => Ok(Role::Director),
            "TEACHER" => Ok(Role::Teacher),
            "STUDENT" => Ok(Role::Student),
            other => Err(ValidationError::invalid_format(
                "role",
                format!("unknown role '{}'", other),
            )),
        }
    }
}
