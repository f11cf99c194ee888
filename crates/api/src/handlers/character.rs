//! Handlers for the `/characters` resource.

use axum::extract::State;
use axum::Json;
use postforge_db::models::character::CharacterWithImage;
use postforge_db::repositories::CharacterRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/characters
///
/// Live characters ordered by name, each with its resolved default image.
pub async fn list(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<CharacterWithImage>>>> {
    let characters = CharacterRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: characters }))
}
