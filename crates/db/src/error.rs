//! Storage error classification.
//!
//! Raw `sqlx::Error`s are sorted into the categories callers act on:
//! a bad reference in the submitted data, a uniqueness conflict, the
//! database being unreachable, or anything else.

/// PostgreSQL SQLSTATE for `foreign_key_violation`.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// PostgreSQL SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL SQLSTATE for `check_violation`.
const CHECK_VIOLATION: &str = "23514";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A persona or character referenced by the campaign does not exist or
    /// has been soft-deleted.
    #[error("Referenced {entity} does not exist: {}", .keys.join(", "))]
    MissingReference {
        entity: &'static str,
        keys: Vec<String>,
    },

    /// A uniqueness constraint rejected the write.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A CHECK constraint rejected the write.
    #[error("Constraint violated: {0}")]
    Constraint(String),

    /// The database could not be reached (pool timeout, I/O, TLS).
    #[error("Storage unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    /// A stored column holds a value the domain enums do not recognise.
    #[error("Unexpected {column} value in storage: {value}")]
    Corrupt { column: &'static str, value: String },

    /// Any other database failure.
    #[error("Query failed: {0}")]
    Query(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        classify(err)
    }
}

/// Sort a `sqlx::Error` into a [`StorageError`] category.
pub fn classify(err: sqlx::Error) -> StorageError {
    if let sqlx::Error::Database(db_err) = &err {
        let code = db_err.code().map(|c| c.into_owned());
        let constraint = db_err.constraint().unwrap_or("unknown").to_string();
        match code.as_deref() {
            Some(FOREIGN_KEY_VIOLATION) => {
                return StorageError::MissingReference {
                    entity: referenced_entity(&constraint),
                    keys: Vec::new(),
                };
            }
            Some(UNIQUE_VIOLATION) => {
                return StorageError::Conflict(format!(
                    "Duplicate value violates unique constraint: {constraint}"
                ));
            }
            Some(CHECK_VIOLATION) => return StorageError::Constraint(constraint),
            _ => {}
        }
    }

    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => StorageError::Unavailable(err),
        _ => StorageError::Query(err),
    }
}

/// Guess the referenced entity from a foreign-key constraint name such as
/// `campaign_personas_persona_key_fkey`.
fn referenced_entity(constraint: &str) -> &'static str {
    if constraint.contains("persona") {
        "persona"
    } else if constraint.contains("character") {
        "character"
    } else {
        "record"
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn pool_timeout_is_unavailable() {
        assert_matches!(
            classify(sqlx::Error::PoolTimedOut),
            StorageError::Unavailable(_)
        );
    }

    #[test]
    fn row_not_found_is_a_query_error() {
        assert_matches!(classify(sqlx::Error::RowNotFound), StorageError::Query(_));
    }

    #[test]
    fn missing_reference_lists_keys() {
        let err = StorageError::MissingReference {
            entity: "persona",
            keys: vec!["p1".into(), "p9".into()],
        };
        assert_eq!(err.to_string(), "Referenced persona does not exist: p1, p9");
    }

    #[test]
    fn constraint_names_map_to_entities() {
        assert_eq!(referenced_entity("campaign_personas_persona_key_fkey"), "persona");
        assert_eq!(
            referenced_entity("campaign_characters_character_id_fkey"),
            "character"
        );
        assert_eq!(referenced_entity("merge_fields_campaign_id_fkey"), "record");
    }
}
