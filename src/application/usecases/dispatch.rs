use std::sync::Arc;

use anyhow::anyhow;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::ports::{clock::Clock, mail_transport::MailTransport};
use crate::application::usecases::mailings::{MailingError, MailingResult};
use crate::domain::{
    entities::mailing_attempts::InsertMailingAttemptEntity,
    repositories::{
        mailing_attempts::MailingAttemptRepository, mailings::MailingRepository,
        messages::MessageRepository,
    },
    value_objects::{
        enums::{attempt_statuses::AttemptStatus, mailing_statuses::MailingStatus},
        iam::{AccessScope, AuthUserModel},
        mailings::SendReport,
    },
};

/// Synchronous bulk send: one transport call per bound recipient, one
/// attempt row per outcome. A transport failure never aborts the
/// batch; only the guard checks up front can reject the call.
pub struct DispatchUseCase<M, G, A, T, K>
where
    M: MailingRepository + Send + Sync + 'static,
    G: MessageRepository + Send + Sync + 'static,
    A: MailingAttemptRepository + Send + Sync + 'static,
    T: MailTransport + Send + Sync + 'static,
    K: Clock + Send + Sync + 'static,
{
    mailing_repo: Arc<M>,
    message_repo: Arc<G>,
    attempt_repo: Arc<A>,
    transport: Arc<T>,
    clock: Arc<K>,
    from_address: String,
}

impl<M, G, A, T, K> DispatchUseCase<M, G, A, T, K>
where
    M: MailingRepository + Send + Sync + 'static,
    G: MessageRepository + Send + Sync + 'static,
    A: MailingAttemptRepository + Send + Sync + 'static,
    T: MailTransport + Send + Sync + 'static,
    K: Clock + Send + Sync + 'static,
{
    pub fn new(
        mailing_repo: Arc<M>,
        message_repo: Arc<G>,
        attempt_repo: Arc<A>,
        transport: Arc<T>,
        clock: Arc<K>,
        from_address: String,
    ) -> Self {
        Self {
            mailing_repo,
            message_repo,
            attempt_repo,
            transport,
            clock,
            from_address,
        }
    }

    pub async fn send_now(
        &self,
        user: &AuthUserModel,
        mailing_id: Uuid,
    ) -> MailingResult<SendReport> {
        let mailing = self
            .mailing_repo
            .find_by_id(mailing_id)
            .await?
            .ok_or(MailingError::NotFound)?;

        let scope = AccessScope::new(user);
        if !scope.can_mutate(mailing.owner_id) {
            return Err(MailingError::PermissionDenied);
        }

        // Guard and transition in one conditional update. The stored
        // status is checked as-is, not recomputed: a mailing stuck at
        // Started still rejects even if its window has elapsed.
        if !self.mailing_repo.mark_started(mailing_id).await? {
            return Err(MailingError::AlreadyRunning);
        }
        info!(%mailing_id, "dispatch: mailing started");

        let message = self
            .message_repo
            .find_by_id(mailing.message_id)
            .await?
            .ok_or_else(|| {
                MailingError::Internal(anyhow!(
                    "message {} referenced by mailing {} is missing",
                    mailing.message_id,
                    mailing_id
                ))
            })?;

        let recipients = self.mailing_repo.list_recipients(mailing_id).await?;

        let mut success_count: i64 = 0;
        let mut failed_count: i64 = 0;

        for recipient in recipients {
            match self
                .transport
                .send(
                    &message.subject,
                    &message.body,
                    &self.from_address,
                    &recipient.email,
                )
                .await
            {
                Ok(()) => {
                    self.attempt_repo
                        .append(InsertMailingAttemptEntity {
                            mailing_id,
                            attempt_time: self.clock.now(),
                            status: AttemptStatus::Success.to_string(),
                            server_response: Some("sent".to_string()),
                        })
                        .await?;
                    success_count += 1;
                }
                Err(error) => {
                    warn!(
                        %mailing_id,
                        recipient = %recipient.email,
                        "dispatch: transport failure: {error:#}"
                    );
                    self.attempt_repo
                        .append(InsertMailingAttemptEntity {
                            mailing_id,
                            attempt_time: self.clock.now(),
                            status: AttemptStatus::Failed.to_string(),
                            server_response: Some(format!("{error:#}")),
                        })
                        .await?;
                    failed_count += 1;
                }
            }
        }

        self.mailing_repo
            .update_status(mailing_id, MailingStatus::Completed.to_string())
            .await?;
        info!(%mailing_id, success_count, failed_count, "dispatch: mailing completed");

        Ok(SendReport {
            success_count,
            failed_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{clock::MockClock, mail_transport::MockMailTransport};
    use crate::domain::{
        entities::{mailings::MailingEntity, messages::MessageEntity, recipients::RecipientEntity},
        repositories::{
            mailing_attempts::MockMailingAttemptRepository, mailings::MockMailingRepository,
            messages::MockMessageRepository,
        },
        value_objects::enums::roles::Role,
    };
    use chrono::{Duration, Utc};

    fn auth_user(role: Role) -> AuthUserModel {
        AuthUserModel {
            user_id: Uuid::new_v4(),
            email: None,
            role,
        }
    }

    fn sample_mailing(owner_id: Uuid, status: MailingStatus) -> MailingEntity {
        let now = Utc::now();
        MailingEntity {
            id: Uuid::new_v4(),
            start_time: now,
            end_time: now + Duration::hours(1),
            status: status.to_string(),
            owner_id,
            message_id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_message(id: Uuid, owner_id: Uuid) -> MessageEntity {
        let now = Utc::now();
        MessageEntity {
            id,
            subject: "Greetings".to_string(),
            body: "Hello there".to_string(),
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_recipient(owner_id: Uuid, email: &str) -> RecipientEntity {
        let now = Utc::now();
        RecipientEntity {
            id: Uuid::new_v4(),
            email: email.to_string(),
            full_name: "Recipient".to_string(),
            comment: String::new(),
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    fn fixed_clock() -> MockClock {
        let mut clock = MockClock::new();
        clock.expect_now().return_const(Utc::now());
        clock
    }

    fn usecase(
        mailing_repo: MockMailingRepository,
        message_repo: MockMessageRepository,
        attempt_repo: MockMailingAttemptRepository,
        transport: MockMailTransport,
        clock: MockClock,
    ) -> DispatchUseCase<
        MockMailingRepository,
        MockMessageRepository,
        MockMailingAttemptRepository,
        MockMailTransport,
        MockClock,
    > {
        DispatchUseCase::new(
            Arc::new(mailing_repo),
            Arc::new(message_repo),
            Arc::new(attempt_repo),
            Arc::new(transport),
            Arc::new(clock),
            "noreply@example.com".to_string(),
        )
    }

    #[tokio::test]
    async fn sends_to_every_recipient_and_completes() {
        let user = auth_user(Role::User);
        let mailing = sample_mailing(user.user_id, MailingStatus::Created);
        let mailing_id = mailing.id;
        let message = sample_message(mailing.message_id, user.user_id);
        let recipients = vec![
            sample_recipient(user.user_id, "a@example.com"),
            sample_recipient(user.user_id, "b@example.com"),
        ];

        let mut mailing_repo = MockMailingRepository::new();
        let mut message_repo = MockMessageRepository::new();
        let mut attempt_repo = MockMailingAttemptRepository::new();
        let mut transport = MockMailTransport::new();

        let found = mailing.clone();
        mailing_repo
            .expect_find_by_id()
            .returning(move |_| {
                let mailing = found.clone();
                Box::pin(async move { Ok(Some(mailing)) })
            });
        mailing_repo
            .expect_mark_started()
            .times(1)
            .returning(|_| Box::pin(async { Ok(true) }));
        mailing_repo
            .expect_list_recipients()
            .returning(move |_| {
                let recipients = recipients.clone();
                Box::pin(async move { Ok(recipients) })
            });
        mailing_repo
            .expect_update_status()
            .withf(move |id, status| *id == mailing_id && status == "completed")
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(()) }));

        message_repo.expect_find_by_id().returning(move |_| {
            let message = message.clone();
            Box::pin(async move { Ok(Some(message)) })
        });

        transport.expect_send().times(2).returning(|_, _, _, _| Ok(()));

        attempt_repo
            .expect_append()
            .withf(move |entity| {
                entity.mailing_id == mailing_id
                    && entity.status == "success"
                    && entity.server_response.as_deref() == Some("sent")
            })
            .times(2)
            .returning(|_| Box::pin(async { Ok(Uuid::new_v4()) }));

        let report = usecase(mailing_repo, message_repo, attempt_repo, transport, fixed_clock())
            .send_now(&user, mailing_id)
            .await
            .unwrap();

        assert_eq!(report.success_count, 2);
        assert_eq!(report.failed_count, 0);
    }

    #[tokio::test]
    async fn transport_failure_is_recorded_and_loop_continues() {
        let user = auth_user(Role::User);
        let mailing = sample_mailing(user.user_id, MailingStatus::Created);
        let mailing_id = mailing.id;
        let message = sample_message(mailing.message_id, user.user_id);
        let recipients = vec![
            sample_recipient(user.user_id, "bounce@example.com"),
            sample_recipient(user.user_id, "fine@example.com"),
        ];

        let mut mailing_repo = MockMailingRepository::new();
        let mut message_repo = MockMessageRepository::new();
        let mut attempt_repo = MockMailingAttemptRepository::new();
        let mut transport = MockMailTransport::new();

        let found = mailing.clone();
        mailing_repo.expect_find_by_id().returning(move |_| {
            let mailing = found.clone();
            Box::pin(async move { Ok(Some(mailing)) })
        });
        mailing_repo
            .expect_mark_started()
            .returning(|_| Box::pin(async { Ok(true) }));
        mailing_repo.expect_list_recipients().returning(move |_| {
            let recipients = recipients.clone();
            Box::pin(async move { Ok(recipients) })
        });
        mailing_repo
            .expect_update_status()
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(()) }));

        message_repo.expect_find_by_id().returning(move |_| {
            let message = message.clone();
            Box::pin(async move { Ok(Some(message)) })
        });

        transport
            .expect_send()
            .withf(|_, _, _, recipient| recipient == "bounce@example.com")
            .returning(|_, _, _, _| Err(anyhow!("mailbox unavailable")));
        transport
            .expect_send()
            .withf(|_, _, _, recipient| recipient == "fine@example.com")
            .returning(|_, _, _, _| Ok(()));

        attempt_repo
            .expect_append()
            .withf(|entity| {
                entity.status == "failed"
                    && entity
                        .server_response
                        .as_deref()
                        .is_some_and(|response| response.contains("mailbox unavailable"))
            })
            .times(1)
            .returning(|_| Box::pin(async { Ok(Uuid::new_v4()) }));
        attempt_repo
            .expect_append()
            .withf(|entity| entity.status == "success")
            .times(1)
            .returning(|_| Box::pin(async { Ok(Uuid::new_v4()) }));

        let report = usecase(mailing_repo, message_repo, attempt_repo, transport, fixed_clock())
            .send_now(&user, mailing_id)
            .await
            .unwrap();

        assert_eq!(report.success_count, 1);
        assert_eq!(report.failed_count, 1);
    }

    #[tokio::test]
    async fn already_running_mailing_is_rejected_without_attempts() {
        let user = auth_user(Role::User);
        let mailing = sample_mailing(user.user_id, MailingStatus::Started);
        let mailing_id = mailing.id;

        let mut mailing_repo = MockMailingRepository::new();
        let found = mailing.clone();
        mailing_repo.expect_find_by_id().returning(move |_| {
            let mailing = found.clone();
            Box::pin(async move { Ok(Some(mailing)) })
        });
        mailing_repo
            .expect_mark_started()
            .times(1)
            .returning(|_| Box::pin(async { Ok(false) }));

        // No expectations on the attempt log, the message store or the
        // transport: any call panics the test.
        let result = usecase(
            mailing_repo,
            MockMessageRepository::new(),
            MockMailingAttemptRepository::new(),
            MockMailTransport::new(),
            fixed_clock(),
        )
        .send_now(&user, mailing_id)
        .await;

        assert!(matches!(result, Err(MailingError::AlreadyRunning)));
    }

    #[tokio::test]
    async fn non_owner_is_denied_before_any_mutation() {
        let owner = Uuid::new_v4();
        let user = auth_user(Role::User);
        let mailing = sample_mailing(owner, MailingStatus::Created);
        let mailing_id = mailing.id;

        let mut mailing_repo = MockMailingRepository::new();
        mailing_repo.expect_find_by_id().returning(move |_| {
            let mailing = mailing.clone();
            Box::pin(async move { Ok(Some(mailing)) })
        });

        let result = usecase(
            mailing_repo,
            MockMessageRepository::new(),
            MockMailingAttemptRepository::new(),
            MockMailTransport::new(),
            fixed_clock(),
        )
        .send_now(&user, mailing_id)
        .await;

        assert!(matches!(result, Err(MailingError::PermissionDenied)));
    }

    #[tokio::test]
    async fn manager_can_send_a_mailing_they_do_not_own() {
        let manager = auth_user(Role::Manager);
        let mailing = sample_mailing(Uuid::new_v4(), MailingStatus::Created);
        let mailing_id = mailing.id;
        let message = sample_message(mailing.message_id, mailing.owner_id);

        let mut mailing_repo = MockMailingRepository::new();
        let mut message_repo = MockMessageRepository::new();
        let mut transport = MockMailTransport::new();

        let found = mailing.clone();
        mailing_repo.expect_find_by_id().returning(move |_| {
            let mailing = found.clone();
            Box::pin(async move { Ok(Some(mailing)) })
        });
        mailing_repo
            .expect_mark_started()
            .returning(|_| Box::pin(async { Ok(true) }));
        mailing_repo
            .expect_list_recipients()
            .returning(|_| Box::pin(async { Ok(Vec::new()) }));
        mailing_repo
            .expect_update_status()
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(()) }));

        message_repo.expect_find_by_id().returning(move |_| {
            let message = message.clone();
            Box::pin(async move { Ok(Some(message)) })
        });

        transport.expect_send().times(0);

        let report = usecase(
            mailing_repo,
            message_repo,
            MockMailingAttemptRepository::new(),
            transport,
            fixed_clock(),
        )
        .send_now(&manager, mailing_id)
        .await
        .unwrap();

        assert_eq!(report.success_count + report.failed_count, 0);
    }

    #[tokio::test]
    async fn missing_mailing_is_not_found() {
        let user = auth_user(Role::User);

        let mut mailing_repo = MockMailingRepository::new();
        mailing_repo
            .expect_find_by_id()
            .returning(|_| Box::pin(async { Ok(None) }));

        let result = usecase(
            mailing_repo,
            MockMessageRepository::new(),
            MockMailingAttemptRepository::new(),
            MockMailTransport::new(),
            fixed_clock(),
        )
        .send_now(&user, Uuid::new_v4())
        .await;

        assert!(matches!(result, Err(MailingError::NotFound)));
    }
}
