use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    #[default]
    User,
    Manager,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let role = match self {
            Role::User => "user",
            Role::Manager => "manager",
        };
        write!(f, "{}", role)
    }
}

impl Role {
    pub fn from_str(value: &str) -> Self {
        match value {
            "manager" => Role::Manager,
            _ => Role::User,
        }
    }

    pub fn is_manager(&self) -> bool {
        matches!(self, Role::Manager)
    }
}
