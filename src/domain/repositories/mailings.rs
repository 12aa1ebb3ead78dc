use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::{
    mailings::{InsertMailingEntity, MailingEntity, UpdateMailingEntity},
    recipients::RecipientEntity,
};

#[async_trait]
#[automock]
pub trait MailingRepository {
    async fn create(
        &self,
        insert_mailing_entity: InsertMailingEntity,
        recipient_ids: Vec<Uuid>,
    ) -> Result<Uuid>;
    async fn find_by_id(&self, mailing_id: Uuid) -> Result<Option<MailingEntity>>;
    async fn list(&self, owner_id: Option<Uuid>) -> Result<Vec<MailingEntity>>;
    async fn update(
        &self,
        mailing_id: Uuid,
        update_mailing_entity: UpdateMailingEntity,
        recipient_ids: Vec<Uuid>,
    ) -> Result<()>;
    /// Persists only the status column.
    async fn update_status(&self, mailing_id: Uuid, status: String) -> Result<()>;
    /// Atomic conditional transition to Started. Returns false when
    /// the stored status already was Started, without touching the
    /// row, so two concurrent senders cannot both pass the guard.
    async fn mark_started(&self, mailing_id: Uuid) -> Result<bool>;
    async fn delete(&self, mailing_id: Uuid) -> Result<()>;
    async fn list_recipients(&self, mailing_id: Uuid) -> Result<Vec<RecipientEntity>>;
    async fn count(&self, owner_id: Option<Uuid>) -> Result<i64>;
    /// Mailings whose stored status is Created or Started and whose
    /// window has not yet elapsed.
    async fn count_active(&self, owner_id: Option<Uuid>, now: DateTime<Utc>) -> Result<i64>;
}
