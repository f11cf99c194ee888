//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument and return [`StorageError`].
//!
//! [`StorageError`]: crate::error::StorageError

pub mod campaign_repo;
pub mod character_repo;
pub mod merge_field_repo;
pub mod persona_repo;

pub use campaign_repo::CampaignRepo;
pub use character_repo::CharacterRepo;
pub use merge_field_repo::MergeFieldRepo;
pub use persona_repo::PersonaRepo;
