use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{RunQueryDsl, delete, insert_into, prelude::*, update};
use uuid::Uuid;

use crate::domain::{
    entities::{
        mailings::{
            InsertMailingEntity, InsertMailingRecipientEntity, MailingEntity,
            UpdateMailingEntity,
        },
        recipients::RecipientEntity,
    },
    repositories::mailings::MailingRepository,
    value_objects::enums::mailing_statuses::MailingStatus,
};
use crate::infrastructure::postgres::{
    postgres_connection::PgPool,
    schema::{mailing_recipients, mailings, recipients},
};

pub struct MailingPostgres {
    db_pool: Arc<PgPool>,
}

impl MailingPostgres {
    pub fn new(db_pool: Arc<PgPool>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl MailingRepository for MailingPostgres {
    async fn create(
        &self,
        insert_mailing_entity: InsertMailingEntity,
        recipient_ids: Vec<Uuid>,
    ) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mailing_id = conn.transaction::<Uuid, diesel::result::Error, _>(|conn| {
            let mailing_id = insert_into(mailings::table)
                .values(&insert_mailing_entity)
                .returning(mailings::id)
                .get_result::<Uuid>(conn)?;

            let bindings: Vec<InsertMailingRecipientEntity> = recipient_ids
                .into_iter()
                .map(|recipient_id| InsertMailingRecipientEntity {
                    mailing_id,
                    recipient_id,
                })
                .collect();
            insert_into(mailing_recipients::table)
                .values(&bindings)
                .on_conflict_do_nothing()
                .execute(conn)?;

            Ok(mailing_id)
        })?;

        Ok(mailing_id)
    }

    async fn find_by_id(&self, mailing_id: Uuid) -> Result<Option<MailingEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = mailings::table
            .find(mailing_id)
            .select(MailingEntity::as_select())
            .first::<MailingEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list(&self, owner_id: Option<Uuid>) -> Result<Vec<MailingEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = mailings::table.into_boxed();
        if let Some(owner_id) = owner_id {
            query = query.filter(mailings::owner_id.eq(owner_id));
        }

        let results = query
            .order(mailings::created_at.desc())
            .select(MailingEntity::as_select())
            .load::<MailingEntity>(&mut conn)?;

        Ok(results)
    }

    async fn update(
        &self,
        mailing_id: Uuid,
        update_mailing_entity: UpdateMailingEntity,
        recipient_ids: Vec<Uuid>,
    ) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        conn.transaction::<(), diesel::result::Error, _>(|conn| {
            update(mailings::table.find(mailing_id))
                .set(&update_mailing_entity)
                .execute(conn)?;

            delete(
                mailing_recipients::table
                    .filter(mailing_recipients::mailing_id.eq(mailing_id)),
            )
            .execute(conn)?;

            let bindings: Vec<InsertMailingRecipientEntity> = recipient_ids
                .into_iter()
                .map(|recipient_id| InsertMailingRecipientEntity {
                    mailing_id,
                    recipient_id,
                })
                .collect();
            insert_into(mailing_recipients::table)
                .values(&bindings)
                .on_conflict_do_nothing()
                .execute(conn)?;

            Ok(())
        })?;

        Ok(())
    }

    async fn update_status(&self, mailing_id: Uuid, status: String) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(mailings::table.find(mailing_id))
            .set(mailings::status.eq(status))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn mark_started(&self, mailing_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // Guard and transition in one statement so concurrent senders
        // cannot both pass.
        let updated = update(
            mailings::table
                .find(mailing_id)
                .filter(mailings::status.ne(MailingStatus::Started.to_string())),
        )
        .set(mailings::status.eq(MailingStatus::Started.to_string()))
        .execute(&mut conn)?;

        Ok(updated > 0)
    }

    async fn delete(&self, mailing_id: Uuid) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // Recipient bindings and attempts go via ON DELETE CASCADE.
        delete(mailings::table.find(mailing_id)).execute(&mut conn)?;

        Ok(())
    }

    async fn list_recipients(&self, mailing_id: Uuid) -> Result<Vec<RecipientEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = mailing_recipients::table
            .inner_join(recipients::table)
            .filter(mailing_recipients::mailing_id.eq(mailing_id))
            .select(RecipientEntity::as_select())
            .load::<RecipientEntity>(&mut conn)?;

        Ok(results)
    }

    async fn count(&self, owner_id: Option<Uuid>) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = mailings::table.into_boxed();
        if let Some(owner_id) = owner_id {
            query = query.filter(mailings::owner_id.eq(owner_id));
        }

        let result = query.count().get_result::<i64>(&mut conn)?;

        Ok(result)
    }

    async fn count_active(&self, owner_id: Option<Uuid>, now: DateTime<Utc>) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = mailings::table
            .filter(mailings::status.eq_any(vec![
                MailingStatus::Created.to_string(),
                MailingStatus::Started.to_string(),
            ]))
            .filter(mailings::end_time.ge(now))
            .into_boxed();
        if let Some(owner_id) = owner_id {
            query = query.filter(mailings::owner_id.eq(owner_id));
        }

        let result = query.count().get_result::<i64>(&mut conn)?;

        Ok(result)
    }
}
