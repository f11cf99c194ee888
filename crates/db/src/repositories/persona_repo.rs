//! Repository for the `personas` table.

use postforge_core::types::DbId;
use sqlx::PgPool;

use crate::error::StorageError;
use crate::models::persona::{CreatePersona, Persona};

const COLUMNS: &str = "key, label, description, created_at, updated_at";

/// Provides create, lookup and soft-delete operations for personas.
pub struct PersonaRepo;

impl PersonaRepo {
    /// Insert a new persona. A duplicate key is reported as a conflict.
    pub async fn create(pool: &PgPool, input: &CreatePersona) -> Result<Persona, StorageError> {
        let query = format!(
            "INSERT INTO personas (key, label, description)
             VALUES ($1, $2, COALESCE($3, ''))
             RETURNING {COLUMNS}"
        );
        let persona = sqlx::query_as::<_, Persona>(&query)
            .bind(&input.key)
            .bind(&input.label)
            .bind(&input.description)
            .fetch_one(pool)
            .await?;
        Ok(persona)
    }

    /// List live personas ordered by label.
    pub async fn list(pool: &PgPool) -> Result<Vec<Persona>, StorageError> {
        let query = format!(
            "SELECT {COLUMNS} FROM personas WHERE deleted_at IS NULL ORDER BY label ASC, key ASC"
        );
        let personas = sqlx::query_as::<_, Persona>(&query).fetch_all(pool).await?;
        Ok(personas)
    }

    /// Live personas linked to a campaign, ordered by label.
    pub async fn list_by_campaign(
        pool: &PgPool,
        campaign_id: DbId,
    ) -> Result<Vec<Persona>, StorageError> {
        let query = format!(
            "SELECT {COLUMNS} FROM personas
             WHERE deleted_at IS NULL
               AND key IN (SELECT persona_key FROM campaign_personas WHERE campaign_id = $1)
             ORDER BY label ASC, key ASC"
        );
        let personas = sqlx::query_as::<_, Persona>(&query)
            .bind(campaign_id)
            .fetch_all(pool)
            .await?;
        Ok(personas)
    }

    /// Soft-delete a persona. Returns `true` if a live row was marked deleted.
    ///
    /// Campaign links are kept; counts and detail views skip deleted personas.
    pub async fn soft_delete(pool: &PgPool, key: &str) -> Result<bool, StorageError> {
        let result = sqlx::query(
            "UPDATE personas SET deleted_at = NOW() WHERE key = $1 AND deleted_at IS NULL",
        )
        .bind(key)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
