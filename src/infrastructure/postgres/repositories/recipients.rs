use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, delete, insert_into, prelude::*, update};
use uuid::Uuid;

use crate::domain::{
    entities::recipients::{InsertRecipientEntity, RecipientEntity, UpdateRecipientEntity},
    repositories::recipients::RecipientRepository,
};
use crate::infrastructure::postgres::{postgres_connection::PgPool, schema::recipients};

pub struct RecipientPostgres {
    db_pool: Arc<PgPool>,
}

impl RecipientPostgres {
    pub fn new(db_pool: Arc<PgPool>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl RecipientRepository for RecipientPostgres {
    async fn create(&self, insert_recipient_entity: InsertRecipientEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(recipients::table)
            .values(&insert_recipient_entity)
            .returning(recipients::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn find_by_id(&self, recipient_id: Uuid) -> Result<Option<RecipientEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = recipients::table
            .find(recipient_id)
            .select(RecipientEntity::as_select())
            .first::<RecipientEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list(&self, owner_id: Option<Uuid>) -> Result<Vec<RecipientEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = recipients::table.into_boxed();
        if let Some(owner_id) = owner_id {
            query = query.filter(recipients::owner_id.eq(owner_id));
        }

        let results = query
            .order(recipients::created_at.desc())
            .select(RecipientEntity::as_select())
            .load::<RecipientEntity>(&mut conn)?;

        Ok(results)
    }

    async fn update(
        &self,
        recipient_id: Uuid,
        update_recipient_entity: UpdateRecipientEntity,
    ) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(recipients::table.find(recipient_id))
            .set(&update_recipient_entity)
            .execute(&mut conn)?;

        Ok(())
    }

    async fn delete(&self, recipient_id: Uuid) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        delete(recipients::table.find(recipient_id)).execute(&mut conn)?;

        Ok(())
    }

    async fn count(&self, owner_id: Option<Uuid>) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = recipients::table.into_boxed();
        if let Some(owner_id) = owner_id {
            query = query.filter(recipients::owner_id.eq(owner_id));
        }

        let result = query.count().get_result::<i64>(&mut conn)?;

        Ok(result)
    }
}
