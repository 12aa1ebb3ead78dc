use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::value_objects::enums::roles::Role;

pub const USER_STATS_TTL: Duration = Duration::from_secs(180);
pub const USER_MAILINGS_TTL: Duration = Duration::from_secs(120);

/// Best-effort key-value cache with per-entry TTL. Absence of an
/// entry is always safe, just slower.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> Option<serde_json::Value>;
    async fn set(&self, key: &str, value: serde_json::Value, ttl: Duration);
    async fn delete(&self, key: &str);
}

pub fn user_stats_key(user_id: Uuid, role: Role) -> String {
    format!("user_stats_{}_{}", user_id, role)
}

pub fn user_mailings_key(user_id: Uuid, role: Role) -> String {
    format!("user_mailings_{}_{}", user_id, role)
}
