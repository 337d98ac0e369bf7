use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum RoleError {
    #[error("Unknown role: {0}")]
    Unknown(String),
}

/// Authorization role with a strict total order. Permission checks compare
/// ranks; anything that fails to parse into a role denies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Host,
    Manager,
    Admin,
}

impl Role {
    pub fn rank(self) -> u8 {
        match self {
            Role::User => 1,
            Role::Host => 2,
            Role::Manager => 3,
            Role::Admin => 4,
        }
    }

    /// `required = None` means any authenticated role passes.
    pub fn has_permission(self, required: Option<Role>) -> bool {
        match required {
            None => true,
            Some(required) => self.rank() >= required.rank(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::User => "USER",
            Role::Host => "HOST",
            Role::Manager => "MANAGER",
            Role::Admin => "ADMIN",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Role::User),
            "HOST" => Ok(Role::Host),
            "MANAGER" => Ok(Role::Manager),
            "ADMIN" => Ok(Role::Admin),
            other => Err(RoleError::Unknown(other.to_string())),
        }
    }
}
