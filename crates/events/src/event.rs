//! The campaign event envelope.

use postforge_core::types::DbId;
use serde::{Deserialize, Serialize};

/// What happened to the campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventAction {
    #[serde(rename = "campaign.created")]
    Created,
}

impl EventAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "campaign.created",
        }
    }
}

/// Body POSTed to the workflow tool, e.g.
/// `{"campaignId": 42, "action": "campaign.created", "data": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignEvent {
    pub campaign_id: DbId,
    pub action: EventAction,
    /// The stored campaign record with its relations.
    pub data: serde_json::Value,
}

impl CampaignEvent {
    /// A `campaign.created` event carrying `data` serialized to JSON.
    pub fn created<T: Serialize>(campaign_id: DbId, data: &T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            campaign_id,
            action: EventAction::Created,
            data: serde_json::to_value(data)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_uses_camel_case_keys() {
        let event = CampaignEvent::created(42, &serde_json::json!({"title": "Launch"})).unwrap();
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "campaignId": 42,
                "action": "campaign.created",
                "data": {"title": "Launch"},
            })
        );
    }

    #[test]
    fn action_label_matches_wire_format() {
        let wire = serde_json::to_value(EventAction::Created).unwrap();
        assert_eq!(wire, EventAction::Created.as_str());
    }
}
