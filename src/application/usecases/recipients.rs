use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::domain::{
    entities::recipients::UpdateRecipientEntity,
    repositories::recipients::RecipientRepository,
    value_objects::{
        iam::{AccessScope, AuthUserModel},
        recipients::{CreateRecipientModel, RecipientModel, UpdateRecipientModel},
    },
};

#[derive(Debug, Error)]
pub enum RecipientError {
    #[error("recipient not found")]
    NotFound,
    #[error("you do not have permission to manage this recipient")]
    PermissionDenied,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl RecipientError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            RecipientError::NotFound => StatusCode::NOT_FOUND,
            RecipientError::PermissionDenied => StatusCode::FORBIDDEN,
            RecipientError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub struct RecipientsUseCase<R>
where
    R: RecipientRepository + Send + Sync + 'static,
{
    recipient_repo: Arc<R>,
}

impl<R> RecipientsUseCase<R>
where
    R: RecipientRepository + Send + Sync + 'static,
{
    pub fn new(recipient_repo: Arc<R>) -> Self {
        Self { recipient_repo }
    }

    pub async fn create(
        &self,
        user: &AuthUserModel,
        create_recipient_model: CreateRecipientModel,
    ) -> Result<Uuid, RecipientError> {
        let recipient_id = self
            .recipient_repo
            .create(create_recipient_model.to_entity(user.user_id))
            .await?;
        info!(%recipient_id, owner_id = %user.user_id, "recipients: created");
        Ok(recipient_id)
    }

    pub async fn list(&self, user: &AuthUserModel) -> Result<Vec<RecipientModel>, RecipientError> {
        let scope = AccessScope::new(user);
        let recipients = self
            .recipient_repo
            .list(scope.owner_filter())
            .await?
            .into_iter()
            .map(RecipientModel::from)
            .collect();
        Ok(recipients)
    }

    pub async fn update(
        &self,
        user: &AuthUserModel,
        recipient_id: Uuid,
        update_recipient_model: UpdateRecipientModel,
    ) -> Result<(), RecipientError> {
        let recipient = self
            .recipient_repo
            .find_by_id(recipient_id)
            .await?
            .ok_or(RecipientError::NotFound)?;

        let scope = AccessScope::new(user);
        if !scope.can_mutate(recipient.owner_id) {
            return Err(RecipientError::PermissionDenied);
        }

        self.recipient_repo
            .update(
                recipient_id,
                UpdateRecipientEntity {
                    email: update_recipient_model.email,
                    full_name: update_recipient_model.full_name,
                    comment: update_recipient_model.comment,
                    updated_at: Utc::now(),
                },
            )
            .await?;
        info!(%recipient_id, "recipients: updated");
        Ok(())
    }

    pub async fn delete(
        &self,
        user: &AuthUserModel,
        recipient_id: Uuid,
    ) -> Result<(), RecipientError> {
        let recipient = self
            .recipient_repo
            .find_by_id(recipient_id)
            .await?
            .ok_or(RecipientError::NotFound)?;

        let scope = AccessScope::new(user);
        if !scope.can_mutate(recipient.owner_id) {
            return Err(RecipientError::PermissionDenied);
        }

        self.recipient_repo.delete(recipient_id).await?;
        info!(%recipient_id, "recipients: deleted");
        Ok(())
    }
}
