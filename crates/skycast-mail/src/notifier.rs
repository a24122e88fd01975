use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use skycast_core::{SmtpConfig, TlsMode};

use crate::message::build_message;
use crate::DeliveryError;

/// Sends one email and reports whether the relay accepted it.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DeliveryError>;
}

/// SMTP relay client. Built once at startup and shared.
#[derive(Clone)]
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpNotifier {
    pub fn from_config(config: &SmtpConfig) -> Result<Self, DeliveryError> {
        let host = config.host.trim();
        let builder = match config.tls {
            TlsMode::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(host)
                .map_err(|e| DeliveryError::Smtp(e.to_string()))?,
            TlsMode::Starttls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                .map_err(|e| DeliveryError::Smtp(e.to_string()))?,
            TlsMode::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host),
        };

        let mut builder = builder
            .port(config.port)
            .timeout(Some(config.timeout()));

        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        tracing::debug!(
            "SMTP relay {}:{} ({:?}), sending as {:?}",
            host,
            config.port,
            config.tls,
            config.sender()
        );

        Ok(Self {
            transport: builder.build(),
            from: config.sender().to_string(),
        })
    }

    /// Address used in the `From` header
    pub fn sender(&self) -> &str {
        &self.from
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DeliveryError> {
        let message = build_message(&self.from, to, subject, body)?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| DeliveryError::Smtp(e.to_string()))?;

        tracing::info!("Weather report sent to {} ({})", to, response.code());
        Ok(())
    }
}
