//! Query parameter types for API handlers.

use serde::Deserialize;

/// Query parameters for `GET /api/v1/campaigns`.
///
/// `status` is one of `draft`, `active`, `completed`, `archived`.
/// `include_archived` defaults to `true`.
#[derive(Debug, Default, Deserialize)]
pub struct CampaignListParams {
    pub status: Option<String>,
    pub include_archived: Option<bool>,
    pub search: Option<String>,
}
