use anyhow::Result;
use async_trait::async_trait;

/// Outbound-email capability: deliver one message to one address.
/// Implementations either succeed or fail with a reason; the send
/// pipeline records the outcome either way.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(
        &self,
        subject: &str,
        body: &str,
        from_address: &str,
        recipient_address: &str,
    ) -> Result<()>;
}
