use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, delete, insert_into, prelude::*, update};
use uuid::Uuid;

use crate::domain::{
    entities::messages::{InsertMessageEntity, MessageEntity, UpdateMessageEntity},
    repositories::messages::MessageRepository,
};
use crate::infrastructure::postgres::{postgres_connection::PgPool, schema::messages};

pub struct MessagePostgres {
    db_pool: Arc<PgPool>,
}

impl MessagePostgres {
    pub fn new(db_pool: Arc<PgPool>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl MessageRepository for MessagePostgres {
    async fn create(&self, insert_message_entity: InsertMessageEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(messages::table)
            .values(&insert_message_entity)
            .returning(messages::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn find_by_id(&self, message_id: Uuid) -> Result<Option<MessageEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = messages::table
            .find(message_id)
            .select(MessageEntity::as_select())
            .first::<MessageEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list(&self, owner_id: Option<Uuid>) -> Result<Vec<MessageEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = messages::table.into_boxed();
        if let Some(owner_id) = owner_id {
            query = query.filter(messages::owner_id.eq(owner_id));
        }

        let results = query
            .order(messages::created_at.desc())
            .select(MessageEntity::as_select())
            .load::<MessageEntity>(&mut conn)?;

        Ok(results)
    }

    async fn update(
        &self,
        message_id: Uuid,
        update_message_entity: UpdateMessageEntity,
    ) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(messages::table.find(message_id))
            .set(&update_message_entity)
            .execute(&mut conn)?;

        Ok(())
    }

    async fn delete(&self, message_id: Uuid) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        delete(messages::table.find(message_id)).execute(&mut conn)?;

        Ok(())
    }
}
