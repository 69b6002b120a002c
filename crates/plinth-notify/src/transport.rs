//! Mail Transports
//!
//! The worker only knows the `MailTransport` trait. Production uses the
//! HTTP mail-API transport; development and tests use the logging transport.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Attempt one delivery. Errors are the caller's to log; the transport
    /// does not retry.
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> anyhow::Result<()>;
}

/// HTTP mail transport configuration
#[derive(Debug, Clone)]
pub struct HttpMailTransportConfig {
    /// Mail API endpoint accepting `{to, subject, body}` JSON
    pub endpoint: String,
    /// Optional Bearer key for the mail API
    pub api_key: Option<String>,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for HttpMailTransportConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8025/send".to_string(),
            api_key: None,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    to: &'a str,
    subject: &'a str,
    body: &'a str,
}

/// Transport posting each message to an external mail API.
pub struct HttpMailTransport {
    config: HttpMailTransportConfig,
    client: reqwest::Client,
}

impl HttpMailTransport {
    pub fn new(config: HttpMailTransportConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl MailTransport for HttpMailTransport {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        let payload = SendRequest {
            to: recipient,
            subject,
            body,
        };

        debug!("Sending mail to {} via {}", recipient, self.config.endpoint);

        let mut request = self.client.post(&self.config.endpoint).json(&payload);
        if let Some(key) = &self.config.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            anyhow::bail!("mail API returned HTTP {}: {}", status, error_body);
        }
        Ok(())
    }
}

/// Transport that only logs; used when no mail endpoint is configured.
#[derive(Debug, Default)]
pub struct LogMailTransport;

#[async_trait]
impl MailTransport for LogMailTransport {
    async fn send(&self, recipient: &str, subject: &str, _body: &str) -> anyhow::Result<()> {
        info!("mail (log only) to={} subject={}", recipient, subject);
        Ok(())
    }
}
