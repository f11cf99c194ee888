//! HTTP webhook notifier.
//!
//! [`WebhookNotifier`] POSTs a JSON-encoded [`CampaignEvent`] to a fixed URL.
//! There is exactly one attempt per event, bounded by the client timeout.

use std::time::Duration;

use async_trait::async_trait;

use crate::event::CampaignEvent;
use crate::notifier::{CampaignNotifier, NotificationError};

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Delivers campaign events to the workflow tool's webhook.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    /// Build a notifier for `url` with the default request timeout.
    pub fn new(url: impl Into<String>) -> Result<Self, reqwest::Error> {
        Self::with_timeout(url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(
        url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CampaignNotifier for WebhookNotifier {
    async fn notify(&self, event: &CampaignEvent) -> Result<(), NotificationError> {
        let response = self.client.post(&self.url).json(event).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotificationError::HttpStatus(status.as_u16()));
        }
        tracing::debug!(
            campaign_id = event.campaign_id,
            action = event.action.as_str(),
            status = status.as_u16(),
            "Webhook delivered",
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_keeps_the_url() {
        let notifier = WebhookNotifier::new("http://localhost:5678/webhook").unwrap();
        assert_eq!(notifier.url(), "http://localhost:5678/webhook");
    }

    #[test]
    fn request_error_display() {
        let req_err = reqwest::Client::new().get("://bad").build().unwrap_err();
        let err = NotificationError::Request(req_err);
        assert!(err.to_string().contains("HTTP request failed"));
    }
}
