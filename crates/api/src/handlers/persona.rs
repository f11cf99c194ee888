//! Handlers for the `/personas` resource.

use axum::extract::State;
use axum::Json;
use postforge_db::models::persona::Persona;
use postforge_db::repositories::PersonaRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/personas
///
/// Live personas, ordered by label, for the campaign form's picker.
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Persona>>>> {
    let personas = PersonaRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: personas }))
}
