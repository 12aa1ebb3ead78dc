use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::mailings::MailingEntity,
    value_objects::enums::mailing_statuses::MailingStatus,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MailingModel {
    pub id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: MailingStatus,
    pub owner_id: Uuid,
    pub message_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MailingEntity> for MailingModel {
    fn from(value: MailingEntity) -> Self {
        Self {
            id: value.id,
            start_time: value.start_time,
            end_time: value.end_time,
            status: MailingStatus::from_str(&value.status),
            owner_id: value.owner_id,
            message_id: value.message_id,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMailingModel {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub message_id: Uuid,
    pub recipient_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMailingModel {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub message_id: Uuid,
    pub recipient_ids: Vec<Uuid>,
}

/// Per-field scheduling violations, keyed the way the form surfaces
/// them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduleErrors {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl ScheduleErrors {
    pub fn is_empty(&self) -> bool {
        self.start_time.is_none() && self.end_time.is_none()
    }
}

impl std::fmt::Display for ScheduleErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        if let Some(message) = &self.start_time {
            parts.push(format!("start_time: {}", message));
        }
        if let Some(message) = &self.end_time {
            parts.push(format!("end_time: {}", message));
        }
        write!(f, "{}", parts.join("; "))
    }
}

/// Validates a sending window. The past-start rule only applies to a
/// mailing that does not exist yet; edits skip it so an in-flight
/// window stays editable.
pub fn validate_schedule(
    now: DateTime<Utc>,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    is_new: bool,
) -> Result<(), ScheduleErrors> {
    let mut errors = ScheduleErrors::default();

    if is_new && start_time < now {
        errors.start_time = Some("start time must not be in the past".to_string());
    }

    if start_time >= end_time {
        errors.start_time = Some("start time must be before end time".to_string());
        errors.end_time = Some("end time must be after start time".to_string());
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendReport {
    pub success_count: i64,
    pub failed_count: i64,
}
