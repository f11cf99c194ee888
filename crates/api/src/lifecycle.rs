//! Campaign lifecycle orchestration.
//!
//! Creation runs validate -> map -> persist -> notify -> invalidate. Only the
//! first three steps can fail the request; the notification outcome is
//! reported back as an advisory. Archive, unpublish and delete are targeted
//! idempotent updates followed by cache invalidation.
//!
//! There is no un-archive or re-publish operation.

use postforge_core::types::DbId;
use postforge_core::validation::{validate_submission, ValidationErrors};
use postforge_db::error::StorageError;
use postforge_db::models::campaign::{CreateCampaign, HydratedCampaign};
use postforge_db::repositories::CampaignRepo;
use postforge_events::{CampaignEvent, NotificationError};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    /// The submission broke one or more field rules. Nothing was written.
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    /// The insert failed. Nothing was written and no notification was sent.
    #[error("Campaign creation failed: {0}")]
    CreationFailed(#[source] StorageError),

    #[error("Campaign {0} not found")]
    NotFound(DbId),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// What happened to the `campaign.created` notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NotificationOutcome {
    Delivered,
    /// No webhook is configured.
    Skipped { reason: String },
    Failed { reason: String },
}

/// Result of a successful create.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedCampaign {
    pub campaign_id: DbId,
    pub notification: NotificationOutcome,
}

/// Administrative actions on an existing campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignAction {
    Archive,
    Unpublish,
    Delete,
}

impl CampaignAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Archive => "archive",
            Self::Unpublish => "unpublish",
            Self::Delete => "delete",
        }
    }
}

/// Validate, persist and announce a new campaign.
pub async fn create_campaign(
    state: &AppState,
    creator_id: Option<String>,
    submission: &serde_json::Value,
) -> Result<CreatedCampaign, LifecycleError> {
    let draft = validate_submission(submission)?;
    if draft.has_reversed_dates() {
        tracing::warn!(
            start_date = ?draft.start_date,
            end_date = ?draft.end_date,
            "Campaign end date precedes its start date",
        );
    }

    let input = CreateCampaign::from_draft(draft, creator_id);
    let created = CampaignRepo::create(&state.pool, &input)
        .await
        .map_err(LifecycleError::CreationFailed)?;
    let campaign_id = created.campaign.id;
    tracing::info!(campaign_id, title = %created.campaign.title, "Campaign created");

    let notification = notify_created(state, &created).await;

    state.cache.invalidate_campaign(campaign_id).await;

    Ok(CreatedCampaign {
        campaign_id,
        notification,
    })
}

/// Send the `campaign.created` event once. Never fails the caller.
async fn notify_created(state: &AppState, created: &HydratedCampaign) -> NotificationOutcome {
    let campaign_id = created.campaign.id;
    let event = match CampaignEvent::created(campaign_id, created) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(campaign_id, error = %e, "Failed to encode campaign event");
            return NotificationOutcome::Failed {
                reason: e.to_string(),
            };
        }
    };

    match state.notifier.notify(&event).await {
        Ok(()) => NotificationOutcome::Delivered,
        Err(NotificationError::NotConfigured(setting)) => {
            tracing::warn!(campaign_id, "Campaign notification skipped: {setting} is not set");
            NotificationOutcome::Skipped {
                reason: format!("{setting} is not set"),
            }
        }
        Err(e) => {
            tracing::warn!(campaign_id, error = %e, "Campaign notification failed");
            NotificationOutcome::Failed {
                reason: e.to_string(),
            }
        }
    }
}

/// Apply an administrative action. Repeating an action is a no-op that
/// still succeeds.
pub async fn apply_action(
    state: &AppState,
    id: DbId,
    action: CampaignAction,
) -> Result<(), LifecycleError> {
    let found = match action {
        CampaignAction::Archive => CampaignRepo::set_archived(&state.pool, id, true).await?,
        CampaignAction::Unpublish => CampaignRepo::set_active(&state.pool, id, false).await?,
        CampaignAction::Delete => CampaignRepo::soft_delete(&state.pool, id).await?,
    };
    if !found {
        return Err(LifecycleError::NotFound(id));
    }

    state.cache.invalidate_campaign(id).await;
    tracing::info!(campaign_id = id, action = action.as_str(), "Campaign action applied");
    Ok(())
}
