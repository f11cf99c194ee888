//! Postforge domain layer.
//!
//! Pure types and logic for campaign management: the typed campaign draft
//! produced by submission validation, the enums shared by the storage and
//! UI shapes, status derivation, and character image resolution. Nothing
//! in this crate performs I/O.

pub mod campaign;
pub mod character;
pub mod error;
pub mod merge_field;
pub mod types;
pub mod validation;
