use crate::types::DbId;
use crate::validation::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A campaign submission broke one or more field rules.
    #[error("Invalid submission: {0}")]
    InvalidSubmission(#[from] ValidationErrors),
}
