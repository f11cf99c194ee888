//! Route definitions for campaigns.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::campaign;
use crate::state::AppState;

/// Routes mounted at `/api/v1/campaigns`.
///
/// ```text
/// GET    /                   -> list
/// POST   /                   -> create
/// GET    /{id}               -> get_by_id
/// DELETE /{id}               -> delete
/// POST   /{id}/archive       -> archive
/// POST   /{id}/unpublish     -> unpublish
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(campaign::list).post(campaign::create))
        .route("/{id}", get(campaign::get_by_id).delete(campaign::delete))
        .route("/{id}/archive", post(campaign::archive))
        .route("/{id}/unpublish", post(campaign::unpublish))
}

/// Unversioned listing at `/api/campaigns`, consumed by the dashboard.
/// Intended for root-level mounting.
pub fn uncached_router() -> Router<AppState> {
    Router::new().route("/api/campaigns", get(campaign::list_uncached))
}
