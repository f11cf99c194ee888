pub mod campaign;
pub mod health;
pub mod reference;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /campaigns                           list, create
/// /campaigns/{id}                      get, delete (soft)
/// /campaigns/{id}/archive              archive (POST)
/// /campaigns/{id}/unpublish            unpublish (POST)
///
/// /personas                            list
/// /characters                          list (with default image)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/campaigns", campaign::router())
        .merge(reference::router())
}
