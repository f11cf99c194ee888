//! Persona entity model and DTOs.

use postforge_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `personas` table. Personas are keyed by an opaque text
/// key rather than a numeric id.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Persona {
    pub key: String,
    pub label: String,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new persona.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePersona {
    pub key: String,
    pub label: String,
    /// Defaults to an empty string.
    pub description: Option<String>,
}
