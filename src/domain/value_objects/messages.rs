use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::messages::{InsertMessageEntity, MessageEntity};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageModel {
    pub id: Uuid,
    pub subject: String,
    pub body: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MessageEntity> for MessageModel {
    fn from(value: MessageEntity) -> Self {
        Self {
            id: value.id,
            subject: value.subject,
            body: value.body,
            owner_id: value.owner_id,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMessageModel {
    pub subject: String,
    pub body: String,
}

impl CreateMessageModel {
    pub fn to_entity(&self, owner_id: Uuid) -> InsertMessageEntity {
        InsertMessageEntity {
            subject: self.subject.clone(),
            body: self.body.clone(),
            owner_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMessageModel {
    pub subject: String,
    pub body: String,
}
