use anyhow::Context as _;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::AuthConfig;
use crate::domain::repository::OtpMailer;
use crate::error::AuthServiceError;

/// SMTP delivery for one-time codes. The code travels through here in
/// cleartext exactly once and is never logged.
#[derive(Clone)]
pub struct SmtpOtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpOtpMailer {
    pub fn new(config: &AuthConfig) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .context("build smtp transport")?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.smtp_email.clone(),
                config.smtp_password.clone(),
            ))
            .build();
        let from = config
            .smtp_email
            .parse()
            .context("parse SMTP_EMAIL as sender mailbox")?;
        Ok(Self { transport, from })
    }
}

impl OtpMailer for SmtpOtpMailer {
    async fn send_code(
        &self,
        to: &str,
        code: &str,
        expires_in_minutes: i64,
    ) -> Result<(), AuthServiceError> {
        let recipient: Mailbox = to
            .parse()
            .map_err(|e| AuthServiceError::EmailSend(anyhow::anyhow!("recipient address: {e}")))?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(recipient)
            .subject("Your verification code")
            .header(ContentType::TEXT_PLAIN)
            .body(format!(
                "Your verification code is {code}. It expires in {expires_in_minutes} minutes."
            ))
            .map_err(|e| AuthServiceError::EmailSend(anyhow::Error::new(e)))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AuthServiceError::EmailSend(anyhow::Error::new(e)))?;
        Ok(())
    }
}
