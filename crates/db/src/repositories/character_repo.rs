//! Repository for the `characters` and `character_assets` tables.

use std::collections::HashMap;

use postforge_core::character::default_image;
use postforge_core::types::DbId;
use sqlx::PgPool;

use crate::error::StorageError;
use crate::models::character::{
    Character, CharacterAsset, CharacterWithImage, CreateCharacter, CreateCharacterAsset,
};

const COLUMNS: &str = "id, name, character_types, is_human, is_trainer, personality, \
     height_centimeters, weight_grams, moral_alignment, created_at, updated_at";

const ASSET_COLUMNS: &str =
    "id, character_id, storage_url, is_primary, deleted_at, created_at";

/// Provides CRUD operations for characters and default-image resolution.
pub struct CharacterRepo;

impl CharacterRepo {
    /// Insert a new character, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCharacter,
    ) -> Result<Character, StorageError> {
        let query = format!(
            "INSERT INTO characters
                (id, name, character_types, is_human, is_trainer, personality,
                 height_centimeters, weight_grams, moral_alignment)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        let character = sqlx::query_as::<_, Character>(&query)
            .bind(&input.id)
            .bind(&input.name)
            .bind(&input.character_types)
            .bind(input.is_human)
            .bind(input.is_trainer)
            .bind(&input.personality)
            .bind(input.height_centimeters)
            .bind(input.weight_grams)
            .bind(&input.moral_alignment)
            .fetch_one(pool)
            .await?;
        Ok(character)
    }

    /// Find a live character by id, with its default image.
    pub async fn find_by_id(
        pool: &PgPool,
        id: &str,
    ) -> Result<Option<CharacterWithImage>, StorageError> {
        let query =
            format!("SELECT {COLUMNS} FROM characters WHERE id = $1 AND deleted_at IS NULL");
        let Some(character) = sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };
        let mut with_images = Self::attach_default_images(pool, vec![character]).await?;
        Ok(with_images.pop())
    }

    /// List live characters ordered by name, each with its default image.
    pub async fn list(pool: &PgPool) -> Result<Vec<CharacterWithImage>, StorageError> {
        let query = format!(
            "SELECT {COLUMNS} FROM characters WHERE deleted_at IS NULL ORDER BY name ASC, id ASC"
        );
        let characters = sqlx::query_as::<_, Character>(&query).fetch_all(pool).await?;
        Self::attach_default_images(pool, characters).await
    }

    /// Live characters linked to a campaign, ordered by name.
    pub async fn list_by_campaign(
        pool: &PgPool,
        campaign_id: DbId,
    ) -> Result<Vec<CharacterWithImage>, StorageError> {
        let query = format!(
            "SELECT {COLUMNS} FROM characters
             WHERE deleted_at IS NULL
               AND id IN (SELECT character_id FROM campaign_characters WHERE campaign_id = $1)
             ORDER BY name ASC, id ASC"
        );
        let characters = sqlx::query_as::<_, Character>(&query)
            .bind(campaign_id)
            .fetch_all(pool)
            .await?;
        Self::attach_default_images(pool, characters).await
    }

    /// Attach an image to a character.
    ///
    /// Only one live primary image is allowed per character; a second one is
    /// rejected by `uq_character_assets_primary` and surfaces as a conflict.
    pub async fn add_asset(
        pool: &PgPool,
        character_id: &str,
        input: &CreateCharacterAsset,
    ) -> Result<CharacterAsset, StorageError> {
        let query = format!(
            "INSERT INTO character_assets (character_id, storage_url, is_primary)
             VALUES ($1, $2, $3)
             RETURNING {ASSET_COLUMNS}"
        );
        let asset = sqlx::query_as::<_, CharacterAsset>(&query)
            .bind(character_id)
            .bind(&input.storage_url)
            .bind(input.is_primary)
            .fetch_one(pool)
            .await?;
        Ok(asset)
    }

    /// Soft-delete an asset. Returns `true` if a live row was marked deleted.
    pub async fn soft_delete_asset(pool: &PgPool, asset_id: DbId) -> Result<bool, StorageError> {
        let result = sqlx::query(
            "UPDATE character_assets SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(asset_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Soft-delete a character. Returns `true` if a live row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query(
            "UPDATE characters SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Load every asset of `characters` in one query and resolve each
    /// character's default image. Deleted assets are fetched too and left to
    /// [`default_image`] to skip.
    async fn attach_default_images(
        pool: &PgPool,
        characters: Vec<Character>,
    ) -> Result<Vec<CharacterWithImage>, StorageError> {
        if characters.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = characters.iter().map(|c| c.id.clone()).collect();
        let query = format!(
            "SELECT {ASSET_COLUMNS} FROM character_assets WHERE character_id = ANY($1)"
        );
        let assets = sqlx::query_as::<_, CharacterAsset>(&query)
            .bind(&ids)
            .fetch_all(pool)
            .await?;

        let mut by_character: HashMap<String, Vec<CharacterAsset>> = HashMap::new();
        for asset in assets {
            by_character
                .entry(asset.character_id.clone())
                .or_default()
                .push(asset);
        }

        Ok(characters
            .into_iter()
            .map(|character| {
                let image = by_character
                    .get(&character.id)
                    .and_then(|assets| default_image(assets))
                    .cloned();
                CharacterWithImage {
                    character,
                    default_image: image,
                }
            })
            .collect())
    }
}
