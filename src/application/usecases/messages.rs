use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::domain::{
    entities::messages::UpdateMessageEntity,
    repositories::messages::MessageRepository,
    value_objects::{
        iam::{AccessScope, AuthUserModel},
        messages::{CreateMessageModel, MessageModel, UpdateMessageModel},
    },
};

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("message not found")]
    NotFound,
    #[error("you do not have permission to manage this message")]
    PermissionDenied,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl MessageError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            MessageError::NotFound => StatusCode::NOT_FOUND,
            MessageError::PermissionDenied => StatusCode::FORBIDDEN,
            MessageError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub struct MessagesUseCase<G>
where
    G: MessageRepository + Send + Sync + 'static,
{
    message_repo: Arc<G>,
}

impl<G> MessagesUseCase<G>
where
    G: MessageRepository + Send + Sync + 'static,
{
    pub fn new(message_repo: Arc<G>) -> Self {
        Self { message_repo }
    }

    pub async fn create(
        &self,
        user: &AuthUserModel,
        create_message_model: CreateMessageModel,
    ) -> Result<Uuid, MessageError> {
        let message_id = self
            .message_repo
            .create(create_message_model.to_entity(user.user_id))
            .await?;
        info!(%message_id, owner_id = %user.user_id, "messages: created");
        Ok(message_id)
    }

    pub async fn list(&self, user: &AuthUserModel) -> Result<Vec<MessageModel>, MessageError> {
        let scope = AccessScope::new(user);
        let messages = self
            .message_repo
            .list(scope.owner_filter())
            .await?
            .into_iter()
            .map(MessageModel::from)
            .collect();
        Ok(messages)
    }

    pub async fn update(
        &self,
        user: &AuthUserModel,
        message_id: Uuid,
        update_message_model: UpdateMessageModel,
    ) -> Result<(), MessageError> {
        let message = self
            .message_repo
            .find_by_id(message_id)
            .await?
            .ok_or(MessageError::NotFound)?;

        let scope = AccessScope::new(user);
        if !scope.can_mutate(message.owner_id) {
            return Err(MessageError::PermissionDenied);
        }

        self.message_repo
            .update(
                message_id,
                UpdateMessageEntity {
                    subject: update_message_model.subject,
                    body: update_message_model.body,
                    updated_at: Utc::now(),
                },
            )
            .await?;
        info!(%message_id, "messages: updated");
        Ok(())
    }

    pub async fn delete(&self, user: &AuthUserModel, message_id: Uuid) -> Result<(), MessageError> {
        let message = self
            .message_repo
            .find_by_id(message_id)
            .await?
            .ok_or(MessageError::NotFound)?;

        let scope = AccessScope::new(user);
        if !scope.can_mutate(message.owner_id) {
            return Err(MessageError::PermissionDenied);
        }

        // Mailings referencing this message go with it (store-level
        // cascade).
        self.message_repo.delete(message_id).await?;
        info!(%message_id, "messages: deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::messages::MessageEntity;
    use crate::domain::repositories::messages::MockMessageRepository;
    use crate::domain::value_objects::enums::roles::Role;

    fn auth_user(role: Role) -> AuthUserModel {
        AuthUserModel {
            user_id: Uuid::new_v4(),
            email: None,
            role,
        }
    }

    fn sample_message(owner_id: Uuid) -> MessageEntity {
        let now = Utc::now();
        MessageEntity {
            id: Uuid::new_v4(),
            subject: "Subject".to_string(),
            body: "Body".to_string(),
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn create_forces_owner_to_acting_user() {
        let user = auth_user(Role::User);
        let user_id = user.user_id;

        let mut message_repo = MockMessageRepository::new();
        message_repo
            .expect_create()
            .withf(move |entity| entity.owner_id == user_id)
            .times(1)
            .returning(|_| Box::pin(async { Ok(Uuid::new_v4()) }));

        let usecase = MessagesUseCase::new(Arc::new(message_repo));
        usecase
            .create(
                &user,
                CreateMessageModel {
                    subject: "Subject".to_string(),
                    body: "Body".to_string(),
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn list_is_scoped_for_regular_users_and_global_for_managers() {
        let user = auth_user(Role::User);
        let user_id = user.user_id;

        let mut message_repo = MockMessageRepository::new();
        message_repo
            .expect_list()
            .withf(move |owner| *owner == Some(user_id))
            .returning(|_| Box::pin(async { Ok(Vec::new()) }));
        let usecase = MessagesUseCase::new(Arc::new(message_repo));
        usecase.list(&user).await.unwrap();

        let manager = auth_user(Role::Manager);
        let mut message_repo = MockMessageRepository::new();
        message_repo
            .expect_list()
            .withf(|owner| owner.is_none())
            .returning(|_| Box::pin(async { Ok(Vec::new()) }));
        let usecase = MessagesUseCase::new(Arc::new(message_repo));
        usecase.list(&manager).await.unwrap();
    }

    #[tokio::test]
    async fn non_owner_cannot_delete() {
        let user = auth_user(Role::User);
        let message = sample_message(Uuid::new_v4());
        let message_id = message.id;

        let mut message_repo = MockMessageRepository::new();
        message_repo.expect_find_by_id().returning(move |_| {
            let message = message.clone();
            Box::pin(async move { Ok(Some(message)) })
        });
        message_repo.expect_delete().times(0);

        let usecase = MessagesUseCase::new(Arc::new(message_repo));
        let result = usecase.delete(&user, message_id).await;
        assert!(matches!(result, Err(MessageError::PermissionDenied)));
    }

    #[tokio::test]
    async fn manager_can_update_any_message() {
        let manager = auth_user(Role::Manager);
        let message = sample_message(Uuid::new_v4());
        let message_id = message.id;

        let mut message_repo = MockMessageRepository::new();
        message_repo.expect_find_by_id().returning(move |_| {
            let message = message.clone();
            Box::pin(async move { Ok(Some(message)) })
        });
        message_repo
            .expect_update()
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(()) }));

        let usecase = MessagesUseCase::new(Arc::new(message_repo));
        usecase
            .update(
                &manager,
                message_id,
                UpdateMessageModel {
                    subject: "New".to_string(),
                    body: "Text".to_string(),
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn missing_message_is_not_found() {
        let user = auth_user(Role::User);

        let mut message_repo = MockMessageRepository::new();
        message_repo
            .expect_find_by_id()
            .returning(|_| Box::pin(async { Ok(None) }));

        let usecase = MessagesUseCase::new(Arc::new(message_repo));
        let result = usecase.delete(&user, Uuid::new_v4()).await;
        assert!(matches!(result, Err(MessageError::NotFound)));
    }
}
