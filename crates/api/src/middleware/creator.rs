//! Request-scoped creator identity.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the opaque id of the user submitting a campaign.
pub const CREATOR_HEADER: &str = "x-user-id";

/// Opaque creator id taken from the `X-User-Id` header.
///
/// The header is optional; a missing or blank value yields `Creator(None)`.
/// Campaigns are not scoped by creator, the id is only recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Creator(pub Option<String>);

impl FromRequestParts<AppState> for Creator {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(raw) = parts.headers.get(CREATOR_HEADER) else {
            return Ok(Creator(None));
        };

        let value = raw.to_str().map_err(|_| {
            AppError::BadRequest(format!("{CREATOR_HEADER} header must be visible ASCII"))
        })?;
        let value = value.trim();

        Ok(Creator((!value.is_empty()).then(|| value.to_string())))
    }
}
