//! Role claim carried by a session.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role claim issued by the credential service.
///
/// Only `student` and `teacher` grant access to anything. Any other value is
/// kept verbatim as [`Role::Unrecognized`] so callers can fall back to the
/// public view instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Student role (`"student"`).
    Student,
    /// Teacher role (`"teacher"`).
    Teacher,
    /// Any other claim value.
    Unrecognized(String),
}

impl Role {
    /// Parse a wire value. Never fails.
    pub fn parse(value: &str) -> Self {
        match value {
            "student" => Role::Student,
            "teacher" => Role::Teacher,
            other => Role::Unrecognized(other.to_string()),
        }
    }

    /// The wire value of this role.
    pub fn as_str(&self) -> &str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
            Role::Unrecognized(value) => value,
        }
    }

    /// Whether this is one of the roles the portal knows about.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Role::Unrecognized(_))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Role::parse(s))
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "student" => Role::Student,
            "teacher" => Role::Teacher,
            _ => Role::Unrecognized(value),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Unrecognized(value) => value,
            known => known.as_str().to_string(),
        }
    }
}
