use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MailingStatus {
    #[default]
    Created,
    Started,
    Completed,
}

impl Display for MailingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            MailingStatus::Created => "created",
            MailingStatus::Started => "started",
            MailingStatus::Completed => "completed",
        };
        write!(f, "{}", status)
    }
}

impl MailingStatus {
    pub fn from_str(value: &str) -> Self {
        match value {
            "created" => MailingStatus::Created,
            "started" => MailingStatus::Started,
            "completed" => MailingStatus::Completed,
            _ => MailingStatus::Created,
        }
    }

    /// Canonical status for a sending window at a given instant.
    /// The stored status is only a snapshot; this is the rule it must
    /// agree with whenever a mailing is read through the detail path.
    pub fn compute(
        now: DateTime<Utc>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        if now < start_time {
            MailingStatus::Created
        } else if now <= end_time {
            MailingStatus::Started
        } else {
            MailingStatus::Completed
        }
    }
}
