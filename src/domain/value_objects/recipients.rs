use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::recipients::{InsertRecipientEntity, RecipientEntity};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipientModel {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub comment: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RecipientEntity> for RecipientModel {
    fn from(value: RecipientEntity) -> Self {
        Self {
            id: value.id,
            email: value.email,
            full_name: value.full_name,
            comment: value.comment,
            owner_id: value.owner_id,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRecipientModel {
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub comment: String,
}

impl CreateRecipientModel {
    pub fn to_entity(&self, owner_id: Uuid) -> InsertRecipientEntity {
        InsertRecipientEntity {
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            comment: self.comment.clone(),
            owner_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRecipientModel {
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub comment: String,
}
