use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::mailing_attempts::MailingAttemptEntity;
use crate::domain::value_objects::enums::attempt_statuses::AttemptStatus;

/// Rollup counts shown on the dashboard. A user sees counts scoped to
/// rows they own; a manager sees global counts.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserStats {
    pub total_mailings: i64,
    pub active_mailings: i64,
    pub unique_recipients: i64,
    pub total_attempts: i64,
    pub successful_attempts: i64,
    pub failed_attempts: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MailingAttemptModel {
    pub id: Uuid,
    pub mailing_id: Uuid,
    pub attempt_time: DateTime<Utc>,
    pub status: AttemptStatus,
    pub server_response: Option<String>,
}

impl From<MailingAttemptEntity> for MailingAttemptModel {
    fn from(value: MailingAttemptEntity) -> Self {
        Self {
            id: value.id,
            mailing_id: value.mailing_id,
            attempt_time: value.attempt_time,
            status: AttemptStatus::from_str(&value.status),
            server_response: value.server_response,
        }
    }
}
