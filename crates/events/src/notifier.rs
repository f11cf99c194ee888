//! The notification seam.
//!
//! Lifecycle code holds an `Arc<dyn CampaignNotifier>` and treats every
//! error as advisory: a failed notification never undoes a campaign write.

use async_trait::async_trait;

use crate::event::CampaignEvent;

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    /// No destination is configured.
    #[error("Notifications are not configured: {0}")]
    NotConfigured(&'static str),

    /// The HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote server returned a non-2xx status code.
    #[error("Webhook returned HTTP {0}")]
    HttpStatus(u16),
}

/// Sends campaign events to an external collaborator.
#[async_trait]
pub trait CampaignNotifier: Send + Sync {
    /// Deliver one event. A single attempt; callers decide what a failure
    /// means.
    async fn notify(&self, event: &CampaignEvent) -> Result<(), NotificationError>;
}

/// Notifier used when no webhook URL is configured. Every call reports
/// [`NotificationError::NotConfigured`] naming the missing setting.
#[derive(Debug, Clone, Copy)]
pub struct DisabledNotifier {
    setting: &'static str,
}

impl DisabledNotifier {
    pub fn new(setting: &'static str) -> Self {
        Self { setting }
    }
}

#[async_trait]
impl CampaignNotifier for DisabledNotifier {
    async fn notify(&self, _event: &CampaignEvent) -> Result<(), NotificationError> {
        Err(NotificationError::NotConfigured(self.setting))
    }
}
