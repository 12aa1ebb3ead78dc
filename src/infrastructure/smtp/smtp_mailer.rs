use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
    message::{Message, header::ContentType},
    transport::smtp::authentication::Credentials,
};

use crate::application::ports::mail_transport::MailTransport;
use crate::config::config_model::Smtp;

/// SMTP-backed mail transport wrapping `lettre::AsyncSmtpTransport`.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: &Smtp) -> Result<Self> {
        let mut builder = if config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .with_context(|| format!("invalid SMTP relay host: {}", config.host))?
        } else {
            // No TLS, for local relays such as Mailpit.
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        }
        .port(config.port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(
        &self,
        subject: &str,
        body: &str,
        from_address: &str,
        recipient_address: &str,
    ) -> Result<()> {
        let email = Message::builder()
            .from(
                from_address
                    .parse()
                    .with_context(|| format!("invalid from address: {}", from_address))?,
            )
            .to(recipient_address
                .parse()
                .with_context(|| format!("invalid recipient address: {}", recipient_address))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .context("failed to build email message")?;

        self.transport
            .send(email)
            .await
            .context("SMTP delivery failed")?;

        Ok(())
    }
}
