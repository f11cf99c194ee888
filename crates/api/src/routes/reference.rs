//! Route definitions for the reference entities a campaign links to.

use axum::routing::get;
use axum::Router;

use crate::handlers::{character, persona};
use crate::state::AppState;

/// ```text
/// GET    /personas            -> persona::list
/// GET    /characters          -> character::list
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/personas", get(persona::list))
        .route("/characters", get(character::list))
}
