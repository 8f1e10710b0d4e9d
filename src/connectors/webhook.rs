// src/connectors/webhook.rs
use crate::connectors::messages::{split_message, WebhookMessage};
use crate::connectors::traits::Notifier;
use crate::error::ConnectorError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{error, info};

pub struct WebhookNotifier {
    http_client: Client,
    url: String,
    max_message_len: usize,
}

impl WebhookNotifier {
    pub fn new(url: String, max_message_len: usize, timeout: Duration) -> Result<Self, ConnectorError> {
        Ok(Self {
            http_client: Client::builder().timeout(timeout).build()?,
            url,
            max_message_len,
        })
    }

    async fn post(&self, content: &str) -> Result<(), ConnectorError> {
        let response = self
            .http_client
            .post(&self.url)
            .json(&WebhookMessage { content })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConnectorError::Status {
                status,
                target: "webhook".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn notify(&self, text: &str) -> bool {
        let parts = split_message(text, self.max_message_len);
        let total = parts.len();
        let mut delivered = 0;

        for part in &parts {
            match self.post(part).await {
                Ok(()) => delivered += 1,
                Err(e) => error!("Webhook delivery failed: {}", e),
            }
        }

        info!("Webhook delivered {}/{} message part(s)", delivered, total);
        delivered == total
    }
}

/// Used when no webhook is configured: the message only reaches the log.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    async fn notify(&self, text: &str) -> bool {
        info!("Notification (no webhook configured):\n{}", text);
        true
    }
}
