use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AttemptStatus {
    Success,
    Failed,
}

impl Display for AttemptStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            AttemptStatus::Success => "success",
            AttemptStatus::Failed => "failed",
        };
        write!(f, "{}", status)
    }
}

impl AttemptStatus {
    pub fn from_str(value: &str) -> Self {
        match value {
            "success" => AttemptStatus::Success,
            _ => AttemptStatus::Failed,
        }
    }
}
