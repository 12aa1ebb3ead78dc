use std::sync::Arc;

use anyhow::Context;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::application::ports::{
    cache::{Cache, USER_MAILINGS_TTL, user_mailings_key, user_stats_key},
    clock::Clock,
};
use crate::domain::{
    entities::mailings::{InsertMailingEntity, UpdateMailingEntity},
    repositories::{
        mailing_attempts::MailingAttemptRepository, mailings::MailingRepository,
    },
    value_objects::{
        enums::mailing_statuses::MailingStatus,
        iam::{AccessScope, AuthUserModel},
        mailings::{
            CreateMailingModel, MailingModel, ScheduleErrors, UpdateMailingModel,
            validate_schedule,
        },
        stats::MailingAttemptModel,
    },
};

#[derive(Debug, Error)]
pub enum MailingError {
    #[error("mailing not found")]
    NotFound,
    #[error("you do not have permission to manage this mailing")]
    PermissionDenied,
    #[error("mailing is already running")]
    AlreadyRunning,
    #[error("invalid sending window: {0}")]
    InvalidSchedule(ScheduleErrors),
    #[error("referenced message or recipient does not exist")]
    InvalidReference,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl MailingError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            MailingError::NotFound => StatusCode::NOT_FOUND,
            MailingError::PermissionDenied => StatusCode::FORBIDDEN,
            MailingError::AlreadyRunning => StatusCode::CONFLICT,
            MailingError::InvalidSchedule(_) => StatusCode::BAD_REQUEST,
            MailingError::InvalidReference => StatusCode::BAD_REQUEST,
            MailingError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type MailingResult<T> = std::result::Result<T, MailingError>;

/// A dangling `message_id` or recipient id surfaces from the store as
/// a foreign-key violation; that is caller input, not a server fault.
fn reference_error(err: anyhow::Error) -> MailingError {
    if let Some(diesel::result::Error::DatabaseError(
        diesel::result::DatabaseErrorKind::ForeignKeyViolation,
        _,
    )) = err.downcast_ref::<diesel::result::Error>()
    {
        return MailingError::InvalidReference;
    }
    MailingError::Internal(err)
}

pub struct MailingsUseCase<M, A, C, K>
where
    M: MailingRepository + Send + Sync + 'static,
    A: MailingAttemptRepository + Send + Sync + 'static,
    C: Cache + Send + Sync + 'static,
    K: Clock + Send + Sync + 'static,
{
    mailing_repo: Arc<M>,
    attempt_repo: Arc<A>,
    cache: Arc<C>,
    clock: Arc<K>,
}

impl<M, A, C, K> MailingsUseCase<M, A, C, K>
where
    M: MailingRepository + Send + Sync + 'static,
    A: MailingAttemptRepository + Send + Sync + 'static,
    C: Cache + Send + Sync + 'static,
    K: Clock + Send + Sync + 'static,
{
    pub fn new(mailing_repo: Arc<M>, attempt_repo: Arc<A>, cache: Arc<C>, clock: Arc<K>) -> Self {
        Self {
            mailing_repo,
            attempt_repo,
            cache,
            clock,
        }
    }

    /// Status is forced to Created and the owner to the acting user,
    /// whatever the caller submitted.
    pub async fn create(
        &self,
        user: &AuthUserModel,
        create_mailing_model: CreateMailingModel,
    ) -> MailingResult<Uuid> {
        validate_schedule(
            self.clock.now(),
            create_mailing_model.start_time,
            create_mailing_model.end_time,
            true,
        )
        .map_err(MailingError::InvalidSchedule)?;

        let insert_entity = InsertMailingEntity {
            start_time: create_mailing_model.start_time,
            end_time: create_mailing_model.end_time,
            status: MailingStatus::Created.to_string(),
            owner_id: user.user_id,
            message_id: create_mailing_model.message_id,
        };

        let mailing_id = self
            .mailing_repo
            .create(insert_entity, create_mailing_model.recipient_ids)
            .await
            .map_err(reference_error)?;

        info!(%mailing_id, owner_id = %user.user_id, "mailings: created");
        self.invalidate_user_caches(user).await;

        Ok(mailing_id)
    }

    /// Owner and status are not settable through this path; the
    /// past-start rule is skipped for existing mailings.
    pub async fn update(
        &self,
        user: &AuthUserModel,
        mailing_id: Uuid,
        update_mailing_model: UpdateMailingModel,
    ) -> MailingResult<()> {
        let mailing = self
            .mailing_repo
            .find_by_id(mailing_id)
            .await?
            .ok_or(MailingError::NotFound)?;

        let scope = AccessScope::new(user);
        if !scope.can_mutate(mailing.owner_id) {
            return Err(MailingError::PermissionDenied);
        }

        validate_schedule(
            self.clock.now(),
            update_mailing_model.start_time,
            update_mailing_model.end_time,
            false,
        )
        .map_err(MailingError::InvalidSchedule)?;

        let update_entity = UpdateMailingEntity {
            start_time: update_mailing_model.start_time,
            end_time: update_mailing_model.end_time,
            message_id: update_mailing_model.message_id,
            updated_at: self.clock.now(),
        };

        self.mailing_repo
            .update(mailing_id, update_entity, update_mailing_model.recipient_ids)
            .await
            .map_err(reference_error)?;

        info!(%mailing_id, "mailings: updated");
        self.invalidate_user_caches(user).await;

        Ok(())
    }

    /// Detail read: the stored status is lazily reconciled with the
    /// canonical rule, persisting only the status column when it
    /// changed. List reads never do this.
    pub async fn get_detail(
        &self,
        user: &AuthUserModel,
        mailing_id: Uuid,
    ) -> MailingResult<MailingModel> {
        let mailing = self
            .mailing_repo
            .find_by_id(mailing_id)
            .await?
            .ok_or(MailingError::NotFound)?;

        let scope = AccessScope::new(user);
        if !scope.can_view(mailing.owner_id) {
            return Err(MailingError::PermissionDenied);
        }

        let stored = MailingStatus::from_str(&mailing.status);
        let computed =
            MailingStatus::compute(self.clock.now(), mailing.start_time, mailing.end_time);

        if computed != stored {
            self.mailing_repo
                .update_status(mailing_id, computed.to_string())
                .await?;
            info!(%mailing_id, from = %stored, to = %computed, "mailings: status reconciled");
        }

        let mut model = MailingModel::from(mailing);
        model.status = computed;
        Ok(model)
    }

    /// Cache-fronted list. A manager sees every mailing, a regular
    /// user only their own; an unauthenticated caller gets an empty
    /// list without touching the store or the cache.
    pub async fn list(&self, user: Option<&AuthUserModel>) -> MailingResult<Vec<MailingModel>> {
        let Some(user) = user else {
            return Ok(Vec::new());
        };

        let scope = AccessScope::new(user);
        let cache_key = user_mailings_key(scope.user_id(), scope.role());

        if let Some(cached) = self.cache.get(&cache_key).await {
            if let Ok(mailings) = serde_json::from_value::<Vec<MailingModel>>(cached) {
                return Ok(mailings);
            }
        }

        let mailings: Vec<MailingModel> = self
            .mailing_repo
            .list(scope.owner_filter())
            .await?
            .into_iter()
            .map(MailingModel::from)
            .collect();

        let cached = serde_json::to_value(&mailings)
            .context("Failed to serialize mailings for the cache")?;
        self.cache.set(&cache_key, cached, USER_MAILINGS_TTL).await;

        Ok(mailings)
    }

    pub async fn delete(&self, user: &AuthUserModel, mailing_id: Uuid) -> MailingResult<()> {
        let mailing = self
            .mailing_repo
            .find_by_id(mailing_id)
            .await?
            .ok_or(MailingError::NotFound)?;

        let scope = AccessScope::new(user);
        if !scope.can_mutate(mailing.owner_id) {
            return Err(MailingError::PermissionDenied);
        }

        // Cascades to the recipient bindings and the attempt log.
        self.mailing_repo.delete(mailing_id).await?;
        info!(%mailing_id, "mailings: deleted");

        Ok(())
    }

    /// The attempt log is as sensitive as the mailing itself (it
    /// carries per-recipient server diagnostics), so it uses the same
    /// view guard as the detail read.
    pub async fn list_attempts(
        &self,
        user: &AuthUserModel,
        mailing_id: Uuid,
    ) -> MailingResult<Vec<MailingAttemptModel>> {
        let mailing = self
            .mailing_repo
            .find_by_id(mailing_id)
            .await?
            .ok_or(MailingError::NotFound)?;

        let scope = AccessScope::new(user);
        if !scope.can_view(mailing.owner_id) {
            return Err(MailingError::PermissionDenied);
        }

        let attempts = self
            .attempt_repo
            .list_for_mailing(mailing_id)
            .await?
            .into_iter()
            .map(MailingAttemptModel::from)
            .collect();

        Ok(attempts)
    }

    async fn invalidate_user_caches(&self, user: &AuthUserModel) {
        self.cache
            .delete(&user_stats_key(user.user_id, user.role))
            .await;
        self.cache
            .delete(&user_mailings_key(user.user_id, user.role))
            .await;
    }
}
