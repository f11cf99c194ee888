//! Character and character asset models.

use postforge_core::character::ImageAsset;
use postforge_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `characters` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Character {
    /// Opaque catalogue id, e.g. `"c1"`.
    pub id: String,
    pub name: String,
    pub character_types: Vec<String>,
    pub is_human: bool,
    pub is_trainer: bool,
    pub personality: Option<String>,
    pub height_centimeters: Option<i32>,
    pub weight_grams: Option<i32>,
    pub moral_alignment: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `character_assets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CharacterAsset {
    pub id: DbId,
    pub character_id: String,
    pub storage_url: String,
    pub is_primary: bool,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl ImageAsset for CharacterAsset {
    fn asset_id(&self) -> DbId {
        self.id
    }

    fn is_primary(&self) -> bool {
        self.is_primary
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }

    fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// A character together with its resolved default image.
#[derive(Debug, Clone, Serialize)]
pub struct CharacterWithImage {
    #[serde(flatten)]
    pub character: Character,
    pub default_image: Option<CharacterAsset>,
}

/// DTO for creating a new character.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCharacter {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub character_types: Vec<String>,
    #[serde(default)]
    pub is_human: bool,
    #[serde(default)]
    pub is_trainer: bool,
    pub personality: Option<String>,
    pub height_centimeters: Option<i32>,
    pub weight_grams: Option<i32>,
    pub moral_alignment: Option<String>,
}

/// DTO for attaching an image to a character.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCharacterAsset {
    pub storage_url: String,
    #[serde(default)]
    pub is_primary: bool,
}
