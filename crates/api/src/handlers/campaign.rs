//! Handlers for the `/campaigns` resource.
//!
//! List and detail reads under `/api/v1` go through the campaign cache,
//! which holds stored records; views and status are rebuilt per request.
//! Every mutation goes through [`lifecycle`](crate::lifecycle), which
//! invalidates the affected tags before the response is sent. The legacy
//! `GET /api/campaigns` listing always reads from the database.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use postforge_core::campaign::CampaignStatus;
use postforge_core::error::CoreError;
use postforge_core::types::DbId;
use postforge_db::models::campaign::{CampaignDetail, CampaignFilter, CampaignWithCounts};
use postforge_db::repositories::CampaignRepo;

use crate::cache::{campaign_tag, CAMPAIGNS_TAG};
use crate::error::{AppError, AppResult};
use crate::lifecycle::{self, CampaignAction, CreatedCampaign};
use crate::middleware::creator::Creator;
use crate::query::CampaignListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/campaigns
///
/// Optional `status`, `include_archived` and `search` query parameters.
/// Status is derived from today's date on every request, cached or not.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<CampaignListParams>,
) -> AppResult<Json<DataResponse<Vec<CampaignWithCounts>>>> {
    let status = params
        .status
        .as_deref()
        .map(|raw| {
            CampaignStatus::parse(raw).ok_or_else(|| {
                AppError::Core(CoreError::Validation(format!(
                    "Unknown status '{raw}', expected draft, active, completed or archived"
                )))
            })
        })
        .transpose()?;
    let include_archived = params.include_archived.unwrap_or(true);
    let search = params
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let filter = CampaignFilter {
        include_archived: include_archived || status == Some(CampaignStatus::Archived),
        is_active: match status {
            Some(CampaignStatus::Draft) => Some(false),
            Some(CampaignStatus::Active | CampaignStatus::Completed) => Some(true),
            Some(CampaignStatus::Archived) | None => None,
        },
        search: search.map(str::to_string),
    };
    let key = format!(
        "campaigns:list:archived={}:active={:?}:search={}",
        filter.include_archived,
        filter.is_active,
        search.unwrap_or_default(),
    );

    let summaries = match state.cache.lists.get(&key).await {
        Some(cached) => cached,
        None => {
            let stamp = state.cache.lists.stamp().await;
            let fresh = Arc::new(CampaignRepo::find_many(&state.pool, &filter).await?);
            state
                .cache
                .lists
                .insert(key, Arc::clone(&fresh), &[CAMPAIGNS_TAG], stamp)
                .await;
            fresh
        }
    };

    let today = state.clock.today();
    let data = summaries
        .iter()
        .filter(|s| status.map_or(true, |wanted| s.status(today) == wanted))
        .map(|s| s.view(today))
        .collect();
    Ok(Json(DataResponse { data }))
}

/// GET /api/campaigns
///
/// Every live campaign with counts, as a bare JSON array. Never cached.
pub async fn list_uncached(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let summaries = CampaignRepo::find_many(&state.pool, &CampaignFilter::default()).await?;
    let today = state.clock.today();
    let campaigns: Vec<CampaignWithCounts> = summaries.iter().map(|s| s.view(today)).collect();
    Ok(([(header::CACHE_CONTROL, "no-store")], Json(campaigns)))
}

/// POST /api/v1/campaigns
///
/// The body is validated as a whole; every rule violation is returned in one
/// 422 response. A webhook failure does not fail the request.
pub async fn create(
    State(state): State<AppState>,
    Creator(creator_id): Creator,
    Json(submission): Json<serde_json::Value>,
) -> AppResult<(StatusCode, Json<DataResponse<CreatedCampaign>>)> {
    let created = lifecycle::create_campaign(&state, creator_id, &submission).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/v1/campaigns/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CampaignDetail>>> {
    let key = format!("campaigns:detail:{id}");
    let aggregate = match state.cache.details.get(&key).await {
        Some(cached) => cached,
        None => {
            let stamp = state.cache.details.stamp().await;
            let fresh = CampaignRepo::find_detail(&state.pool, id)
                .await?
                .map(Arc::new)
                .ok_or(AppError::Core(CoreError::NotFound {
                    entity: "Campaign",
                    id,
                }))?;
            let own = campaign_tag(id);
            state
                .cache
                .details
                .insert(key, Arc::clone(&fresh), &[own.as_str()], stamp)
                .await;
            fresh
        }
    };

    Ok(Json(DataResponse {
        data: aggregate.view(state.clock.today()),
    }))
}

/// POST /api/v1/campaigns/{id}/archive
pub async fn archive(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    lifecycle::apply_action(&state, id, CampaignAction::Archive).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/campaigns/{id}/unpublish
pub async fn unpublish(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    lifecycle::apply_action(&state, id, CampaignAction::Unpublish).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/campaigns/{id}
///
/// Soft delete. Deleting an already-deleted campaign also returns 204.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    lifecycle::apply_action(&state, id, CampaignAction::Delete).await?;
    Ok(StatusCode::NO_CONTENT)
}
