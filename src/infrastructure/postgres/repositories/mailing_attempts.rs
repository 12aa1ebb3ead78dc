use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into, prelude::*};
use uuid::Uuid;

use crate::domain::{
    entities::mailing_attempts::{InsertMailingAttemptEntity, MailingAttemptEntity},
    repositories::mailing_attempts::MailingAttemptRepository,
};
use crate::infrastructure::postgres::{
    postgres_connection::PgPool,
    schema::{mailing_attempts, mailings},
};

pub struct MailingAttemptPostgres {
    db_pool: Arc<PgPool>,
}

impl MailingAttemptPostgres {
    pub fn new(db_pool: Arc<PgPool>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl MailingAttemptRepository for MailingAttemptPostgres {
    async fn append(
        &self,
        insert_mailing_attempt_entity: InsertMailingAttemptEntity,
    ) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(mailing_attempts::table)
            .values(&insert_mailing_attempt_entity)
            .returning(mailing_attempts::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn list_for_mailing(&self, mailing_id: Uuid) -> Result<Vec<MailingAttemptEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = mailing_attempts::table
            .filter(mailing_attempts::mailing_id.eq(mailing_id))
            .order(mailing_attempts::attempt_time.desc())
            .select(MailingAttemptEntity::as_select())
            .load::<MailingAttemptEntity>(&mut conn)?;

        Ok(results)
    }

    async fn count(&self, owner_id: Option<Uuid>) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = match owner_id {
            Some(owner_id) => mailing_attempts::table
                .inner_join(mailings::table)
                .filter(mailings::owner_id.eq(owner_id))
                .count()
                .get_result::<i64>(&mut conn)?,
            None => mailing_attempts::table
                .count()
                .get_result::<i64>(&mut conn)?,
        };

        Ok(result)
    }

    async fn count_by_status(&self, owner_id: Option<Uuid>, status: String) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = match owner_id {
            Some(owner_id) => mailing_attempts::table
                .inner_join(mailings::table)
                .filter(mailings::owner_id.eq(owner_id))
                .filter(mailing_attempts::status.eq(status))
                .count()
                .get_result::<i64>(&mut conn)?,
            None => mailing_attempts::table
                .filter(mailing_attempts::status.eq(status))
                .count()
                .get_result::<i64>(&mut conn)?,
        };

        Ok(result)
    }
}
