use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::mailing_attempts::{
    InsertMailingAttemptEntity, MailingAttemptEntity,
};

/// Append-only log: rows are written once per recipient per send and
/// only ever removed by the cascade from their mailing.
#[async_trait]
#[automock]
pub trait MailingAttemptRepository {
    async fn append(
        &self,
        insert_mailing_attempt_entity: InsertMailingAttemptEntity,
    ) -> Result<Uuid>;
    async fn list_for_mailing(&self, mailing_id: Uuid) -> Result<Vec<MailingAttemptEntity>>;
    async fn count(&self, owner_id: Option<Uuid>) -> Result<i64>;
    async fn count_by_status(&self, owner_id: Option<Uuid>, status: String) -> Result<i64>;
}
