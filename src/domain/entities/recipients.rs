use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::recipients;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = recipients)]
pub struct RecipientEntity {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub comment: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipients)]
pub struct InsertRecipientEntity {
    pub email: String,
    pub full_name: String,
    pub comment: String,
    pub owner_id: Uuid,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = recipients)]
pub struct UpdateRecipientEntity {
    pub email: String,
    pub full_name: String,
    pub comment: String,
    pub updated_at: DateTime<Utc>,
}
