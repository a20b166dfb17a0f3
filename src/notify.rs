/// Out-of-band notification dispatch
///
/// The auth core only needs `notify`; transports live behind the trait.
/// Email goes out over SMTP, SMS delivery is owned by the host application
/// and defaults to a log-only stub.
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;
use crate::error::{AuthError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Sms,
    Email,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Dispatch a payload to a destination over the given channel.
    async fn notify(&self, channel: Channel, destination: &str, payload: &str) -> Result<()>;
}

/// Log-only transport, used when no real transport is configured and as the
/// SMS fallback in development.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, channel: Channel, destination: &str, _payload: &str) -> Result<()> {
        tracing::info!(?channel, destination, "notification dispatched to log");
        Ok(())
    }
}

/// SMTP-backed email transport; SMS still goes to the log.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpNotifier {
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| AuthError::SmsError(e.to_string()))?
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from: config.from.clone(),
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(&self, channel: Channel, destination: &str, payload: &str) -> Result<()> {
        match channel {
            Channel::Email => {
                let message = Message::builder()
                    .from(
                        self.from
                            .parse()
                            .map_err(|_| AuthError::SmsError("bad sender address".to_string()))?,
                    )
                    .to(destination
                        .parse()
                        .map_err(|_| AuthError::SmsError("bad recipient address".to_string()))?)
                    .subject("Verification")
                    .header(ContentType::TEXT_PLAIN)
                    .body(payload.to_string())
                    .map_err(|e| AuthError::SmsError(e.to_string()))?;

                self.transport
                    .send(message)
                    .await
                    .map_err(|e| AuthError::SmsError(e.to_string()))?;

                tracing::info!(destination, "verification email dispatched");
                Ok(())
            }
            Channel::Sms => {
                tracing::info!(destination, "no SMS transport configured, logged only");
                Ok(())
            }
        }
    }
}
