//! Merge-field value types and timing helpers.
//!
//! Merge fields are placeholders the workflow tool fills in when rendering a
//! video post. Each one occupies a time window (`start_time..end_time`, in
//! whole seconds) of the video.

use serde::{Deserialize, Serialize};

/// What kind of value a merge field carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeFieldValueType {
    Text,
    Number,
    Image,
    Video,
}

impl MergeFieldValueType {
    /// Every value type offered to the campaign form.
    pub const ALL: [MergeFieldValueType; 4] = [
        MergeFieldValueType::Text,
        MergeFieldValueType::Number,
        MergeFieldValueType::Image,
        MergeFieldValueType::Video,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Image => "image",
            Self::Video => "video",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

impl Default for MergeFieldValueType {
    fn default() -> Self {
        Self::Text
    }
}

/// Length of a merge field's overlay window in seconds.
///
/// Validated input always has `end >= start`; rows predating that check are
/// clamped to zero rather than reported as negative.
pub fn duration_secs(start_time: i32, end_time: i32) -> i32 {
    (end_time - start_time).max(0)
}
