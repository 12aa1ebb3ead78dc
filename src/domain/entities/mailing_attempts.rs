use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::mailing_attempts;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = mailing_attempts)]
pub struct MailingAttemptEntity {
    pub id: Uuid,
    pub mailing_id: Uuid,
    pub attempt_time: DateTime<Utc>,
    pub status: String,
    pub server_response: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = mailing_attempts)]
pub struct InsertMailingAttemptEntity {
    pub mailing_id: Uuid,
    pub attempt_time: DateTime<Utc>,
    pub status: String,
    pub server_response: Option<String>,
}
