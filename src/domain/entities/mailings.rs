use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::{mailing_recipients, mailings};

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = mailings)]
pub struct MailingEntity {
    pub id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
    pub owner_id: Uuid,
    pub message_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = mailings)]
pub struct InsertMailingEntity {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
    pub owner_id: Uuid,
    pub message_id: Uuid,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = mailing_recipients)]
pub struct InsertMailingRecipientEntity {
    pub mailing_id: Uuid,
    pub recipient_id: Uuid,
}

// Owner and status are deliberately absent: neither is settable
// through the edit path.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = mailings)]
pub struct UpdateMailingEntity {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub message_id: Uuid,
    pub updated_at: DateTime<Utc>,
}
