use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::recipients::{
    InsertRecipientEntity, RecipientEntity, UpdateRecipientEntity,
};

#[async_trait]
#[automock]
pub trait RecipientRepository {
    async fn create(&self, insert_recipient_entity: InsertRecipientEntity) -> Result<Uuid>;
    async fn find_by_id(&self, recipient_id: Uuid) -> Result<Option<RecipientEntity>>;
    async fn list(&self, owner_id: Option<Uuid>) -> Result<Vec<RecipientEntity>>;
    async fn update(
        &self,
        recipient_id: Uuid,
        update_recipient_entity: UpdateRecipientEntity,
    ) -> Result<()>;
    async fn delete(&self, recipient_id: Uuid) -> Result<()>;
    async fn count(&self, owner_id: Option<Uuid>) -> Result<i64>;
}
