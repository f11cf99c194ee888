//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` struct matching the database row
//! - Where stored text columns carry enum values, a typed record converted
//!   from the row with `TryFrom`
//! - Create DTOs for inserts and the serialized views the API returns

pub mod campaign;
pub mod character;
pub mod merge_field;
pub mod persona;
