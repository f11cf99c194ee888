//! Merge field model and DTOs.

use postforge_core::merge_field::{duration_secs, MergeFieldValueType};
use postforge_core::types::{DbId, Timestamp};
use postforge_core::validation::MergeFieldDraft;
use serde::Serialize;
use sqlx::FromRow;

use crate::error::StorageError;

/// A raw row from the `merge_fields` table.
#[derive(Debug, Clone, FromRow)]
pub struct MergeFieldRow {
    pub id: DbId,
    pub campaign_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub value_type: String,
    pub default_value: Option<String>,
    pub start_time: i32,
    pub end_time: i32,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A merge field with its value type decoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeField {
    pub id: DbId,
    pub campaign_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub value_type: MergeFieldValueType,
    pub default_value: Option<String>,
    pub start_time: i32,
    pub end_time: i32,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl MergeField {
    pub fn duration(&self) -> i32 {
        duration_secs(self.start_time, self.end_time)
    }
}

impl TryFrom<MergeFieldRow> for MergeField {
    type Error = StorageError;

    fn try_from(row: MergeFieldRow) -> Result<Self, Self::Error> {
        let value_type =
            MergeFieldValueType::parse(&row.value_type).ok_or_else(|| StorageError::Corrupt {
                column: "merge_fields.value_type",
                value: row.value_type.clone(),
            })?;
        Ok(Self {
            id: row.id,
            campaign_id: row.campaign_id,
            name: row.name,
            description: row.description,
            value_type,
            default_value: row.default_value,
            start_time: row.start_time,
            end_time: row.end_time,
            sort_order: row.sort_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Merge field as shown in the campaign detail view.
#[derive(Debug, Clone, Serialize)]
pub struct MergeFieldView {
    #[serde(flatten)]
    pub field: MergeField,
    /// `end_time - start_time`, in seconds.
    pub duration: i32,
}

impl From<MergeField> for MergeFieldView {
    fn from(field: MergeField) -> Self {
        let duration = field.duration();
        Self { field, duration }
    }
}

/// Insert input for one merge field. `sort_order` preserves submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateMergeField {
    pub name: String,
    pub description: Option<String>,
    pub value_type: MergeFieldValueType,
    pub default_value: Option<String>,
    pub start_time: i32,
    pub end_time: i32,
    pub sort_order: i32,
}

impl CreateMergeField {
    pub fn from_draft(draft: MergeFieldDraft, sort_order: i32) -> Self {
        Self {
            name: draft.name,
            description: draft.description,
            value_type: draft.value_type,
            default_value: draft.default_value,
            start_time: draft.start_time,
            end_time: draft.end_time,
            sort_order,
        }
    }
}
