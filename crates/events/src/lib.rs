//! Outbound campaign notifications.
//!
//! - [`CampaignEvent`]: the envelope sent to the workflow tool.
//! - [`CampaignNotifier`]: the seam the lifecycle layer notifies through.
//! - [`delivery`]: concrete notifiers (HTTP webhook, disabled).

pub mod delivery;
pub mod event;
pub mod notifier;

pub use delivery::webhook::WebhookNotifier;
pub use event::{CampaignEvent, EventAction};
pub use notifier::{CampaignNotifier, DisabledNotifier, NotificationError};
