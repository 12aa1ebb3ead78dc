use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use crate::application::ports::{
    cache::{Cache, USER_STATS_TTL, user_stats_key},
    clock::Clock,
};
use crate::domain::{
    repositories::{
        mailing_attempts::MailingAttemptRepository, mailings::MailingRepository,
        recipients::RecipientRepository,
    },
    value_objects::{
        enums::attempt_statuses::AttemptStatus,
        iam::{AccessScope, AuthUserModel},
        stats::UserStats,
    },
};

/// Dashboard rollups behind a TTL cache keyed by user identity and
/// role. Within the TTL the cached structure is returned verbatim;
/// staleness is bounded by the TTL, never checked against the store.
pub struct StatisticsUseCase<M, R, A, C, K>
where
    M: MailingRepository + Send + Sync + 'static,
    R: RecipientRepository + Send + Sync + 'static,
    A: MailingAttemptRepository + Send + Sync + 'static,
    C: Cache + Send + Sync + 'static,
    K: Clock + Send + Sync + 'static,
{
    mailing_repo: Arc<M>,
    recipient_repo: Arc<R>,
    attempt_repo: Arc<A>,
    cache: Arc<C>,
    clock: Arc<K>,
}

impl<M, R, A, C, K> StatisticsUseCase<M, R, A, C, K>
where
    M: MailingRepository + Send + Sync + 'static,
    R: RecipientRepository + Send + Sync + 'static,
    A: MailingAttemptRepository + Send + Sync + 'static,
    C: Cache + Send + Sync + 'static,
    K: Clock + Send + Sync + 'static,
{
    pub fn new(
        mailing_repo: Arc<M>,
        recipient_repo: Arc<R>,
        attempt_repo: Arc<A>,
        cache: Arc<C>,
        clock: Arc<K>,
    ) -> Self {
        Self {
            mailing_repo,
            recipient_repo,
            attempt_repo,
            cache,
            clock,
        }
    }

    pub async fn get_user_stats(&self, user: Option<&AuthUserModel>) -> Result<UserStats> {
        // Anonymous callers get zeroes without touching store or cache.
        let Some(user) = user else {
            return Ok(UserStats::default());
        };

        let scope = AccessScope::new(user);
        let cache_key = user_stats_key(scope.user_id(), scope.role());

        if let Some(cached) = self.cache.get(&cache_key).await {
            if let Ok(stats) = serde_json::from_value::<UserStats>(cached) {
                debug!(user_id = %scope.user_id(), "statistics: cache hit");
                return Ok(stats);
            }
        }

        let owner_id = scope.owner_filter();
        let now = self.clock.now();

        let stats = UserStats {
            total_mailings: self.mailing_repo.count(owner_id).await?,
            active_mailings: self.mailing_repo.count_active(owner_id, now).await?,
            unique_recipients: self.recipient_repo.count(owner_id).await?,
            total_attempts: self.attempt_repo.count(owner_id).await?,
            successful_attempts: self
                .attempt_repo
                .count_by_status(owner_id, AttemptStatus::Success.to_string())
                .await?,
            failed_attempts: self
                .attempt_repo
                .count_by_status(owner_id, AttemptStatus::Failed.to_string())
                .await?,
        };

        let cached =
            serde_json::to_value(&stats).context("Failed to serialize stats for the cache")?;
        self.cache.set(&cache_key, cached, USER_STATS_TTL).await;

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::cache::MockCache;
    use crate::application::ports::clock::MockClock;
    use crate::domain::repositories::{
        mailing_attempts::MockMailingAttemptRepository, mailings::MockMailingRepository,
        recipients::MockRecipientRepository,
    };
    use crate::domain::value_objects::enums::roles::Role;
    use crate::infrastructure::cache::memory::MemoryCache;
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    fn auth_user(role: Role) -> AuthUserModel {
        AuthUserModel {
            user_id: Uuid::new_v4(),
            email: None,
            role,
        }
    }

    fn fixed_clock() -> MockClock {
        let mut clock = MockClock::new();
        clock.expect_now().return_const(Utc::now());
        clock
    }

    fn counting_repos(
        expected_owner: Option<Uuid>,
        calls_each: usize,
    ) -> (
        MockMailingRepository,
        MockRecipientRepository,
        MockMailingAttemptRepository,
    ) {
        let mut mailing_repo = MockMailingRepository::new();
        let mut recipient_repo = MockRecipientRepository::new();
        let mut attempt_repo = MockMailingAttemptRepository::new();

        mailing_repo
            .expect_count()
            .withf(move |owner| *owner == expected_owner)
            .times(calls_each)
            .returning(|_| Box::pin(async { Ok(4) }));
        mailing_repo
            .expect_count_active()
            .withf(move |owner, _| *owner == expected_owner)
            .times(calls_each)
            .returning(|_, _| Box::pin(async { Ok(2) }));
        recipient_repo
            .expect_count()
            .withf(move |owner| *owner == expected_owner)
            .times(calls_each)
            .returning(|_| Box::pin(async { Ok(7) }));
        attempt_repo
            .expect_count()
            .withf(move |owner| *owner == expected_owner)
            .times(calls_each)
            .returning(|_| Box::pin(async { Ok(10) }));
        attempt_repo
            .expect_count_by_status()
            .withf(move |owner, status| *owner == expected_owner && status == "success")
            .times(calls_each)
            .returning(|_, _| Box::pin(async { Ok(8) }));
        attempt_repo
            .expect_count_by_status()
            .withf(move |owner, status| *owner == expected_owner && status == "failed")
            .times(calls_each)
            .returning(|_, _| Box::pin(async { Ok(2) }));

        (mailing_repo, recipient_repo, attempt_repo)
    }

    #[tokio::test]
    async fn unauthenticated_caller_gets_zeroes_without_any_access() {
        // No expectations anywhere: a single store or cache call
        // panics the test.
        let usecase = StatisticsUseCase::new(
            Arc::new(MockMailingRepository::new()),
            Arc::new(MockRecipientRepository::new()),
            Arc::new(MockMailingAttemptRepository::new()),
            Arc::new(MockCache::new()),
            Arc::new(MockClock::new()),
        );

        let stats = usecase.get_user_stats(None).await.unwrap();
        assert_eq!(stats, UserStats::default());
    }

    #[tokio::test]
    async fn cached_stats_are_returned_verbatim() {
        let user = auth_user(Role::User);
        let cached = UserStats {
            total_mailings: 99,
            ..UserStats::default()
        };

        let mut cache = MockCache::new();
        let payload = serde_json::to_value(&cached).unwrap();
        cache.expect_get().returning(move |_| Some(payload.clone()));

        let usecase = StatisticsUseCase::new(
            Arc::new(MockMailingRepository::new()),
            Arc::new(MockRecipientRepository::new()),
            Arc::new(MockMailingAttemptRepository::new()),
            Arc::new(cache),
            Arc::new(MockClock::new()),
        );

        let stats = usecase.get_user_stats(Some(&user)).await.unwrap();
        assert_eq!(stats, cached);
    }

    #[tokio::test]
    async fn regular_user_counts_are_scoped_to_their_rows() {
        let user = auth_user(Role::User);
        let (mailing_repo, recipient_repo, attempt_repo) =
            counting_repos(Some(user.user_id), 1);

        let mut cache = MockCache::new();
        cache.expect_get().returning(|_| None);
        cache
            .expect_set()
            .withf(|key, _, ttl| key.starts_with("user_stats_") && *ttl == USER_STATS_TTL)
            .times(1)
            .returning(|_, _, _| ());

        let usecase = StatisticsUseCase::new(
            Arc::new(mailing_repo),
            Arc::new(recipient_repo),
            Arc::new(attempt_repo),
            Arc::new(cache),
            Arc::new(fixed_clock()),
        );

        let stats = usecase.get_user_stats(Some(&user)).await.unwrap();
        assert_eq!(stats.total_mailings, 4);
        assert_eq!(stats.active_mailings, 2);
        assert_eq!(stats.unique_recipients, 7);
        assert_eq!(stats.total_attempts, 10);
        assert_eq!(stats.successful_attempts, 8);
        assert_eq!(stats.failed_attempts, 2);
    }

    #[tokio::test]
    async fn manager_counts_are_global() {
        let manager = auth_user(Role::Manager);
        let (mailing_repo, recipient_repo, attempt_repo) = counting_repos(None, 1);

        let mut cache = MockCache::new();
        cache.expect_get().returning(|_| None);
        cache.expect_set().returning(|_, _, _| ());

        let usecase = StatisticsUseCase::new(
            Arc::new(mailing_repo),
            Arc::new(recipient_repo),
            Arc::new(attempt_repo),
            Arc::new(cache),
            Arc::new(fixed_clock()),
        );

        let stats = usecase.get_user_stats(Some(&manager)).await.unwrap();
        assert_eq!(stats.total_mailings, 4);
    }

    #[tokio::test]
    async fn consecutive_reads_within_ttl_hit_the_cache() {
        let user = auth_user(Role::User);
        // Each count expectation allows exactly one call; the second
        // read must be served from the cache.
        let (mailing_repo, recipient_repo, attempt_repo) =
            counting_repos(Some(user.user_id), 1);

        let usecase = StatisticsUseCase::new(
            Arc::new(mailing_repo),
            Arc::new(recipient_repo),
            Arc::new(attempt_repo),
            Arc::new(MemoryCache::new()),
            Arc::new(fixed_clock()),
        );

        let first = usecase.get_user_stats(Some(&user)).await.unwrap();
        let second = usecase.get_user_stats(Some(&user)).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn corrupt_cache_entry_falls_back_to_the_store() {
        let user = auth_user(Role::User);
        let (mailing_repo, recipient_repo, attempt_repo) =
            counting_repos(Some(user.user_id), 1);

        let mut cache = MockCache::new();
        cache.expect_get().returning(|_| Some(json!("not stats")));
        cache.expect_set().returning(|_, _, _| ());

        let usecase = StatisticsUseCase::new(
            Arc::new(mailing_repo),
            Arc::new(recipient_repo),
            Arc::new(attempt_repo),
            Arc::new(cache),
            Arc::new(fixed_clock()),
        );

        let stats = usecase.get_user_stats(Some(&user)).await.unwrap();
        assert_eq!(stats.total_mailings, 4);
    }
}
