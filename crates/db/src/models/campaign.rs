//! Campaign models: the stored row, its typed record, the create input,
//! and the list/detail views built from them.

use postforge_core::campaign::{
    Cadence, CampaignStatus, Frequency, PostLength, PostType, StoredPostType, VideoLength,
    Weekday,
};
use postforge_core::types::{CalendarDate, DbId, Timestamp};
use postforge_core::validation::CampaignDraft;
use serde::Serialize;
use sqlx::FromRow;

use crate::error::StorageError;
use crate::models::character::CharacterWithImage;
use crate::models::merge_field::{CreateMergeField, MergeField, MergeFieldView};
use crate::models::persona::Persona;

// ---------------------------------------------------------------------------
// Stored row
// ---------------------------------------------------------------------------

/// A raw row from the `campaigns` table. Enum columns are plain text here;
/// convert to [`CampaignRecord`] before use.
#[derive(Debug, Clone, FromRow)]
pub struct CampaignRow {
    pub id: DbId,
    pub creator_id: Option<String>,
    pub title: String,
    pub objective: String,
    pub narrative_context: Option<String>,
    pub days_of_week: Vec<String>,
    pub frequency: String,
    pub post_type: String,
    pub post_length: String,
    pub video_length: Option<i32>,
    pub start_date: Option<CalendarDate>,
    pub end_date: Option<CalendarDate>,
    pub is_active: bool,
    pub is_archived: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A campaign row joined with its live persona and character counts.
#[derive(Debug, Clone, FromRow)]
pub struct CampaignCountsRow {
    #[sqlx(flatten)]
    pub campaign: CampaignRow,
    pub persona_count: i64,
    pub character_count: i64,
}

/// A stored campaign with every enum column decoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignRecord {
    pub id: DbId,
    pub creator_id: Option<String>,
    pub title: String,
    pub objective: String,
    pub narrative_context: Option<String>,
    #[serde(flatten)]
    pub cadence: Cadence,
    pub post_type: StoredPostType,
    pub post_length: PostLength,
    pub video_length: Option<VideoLength>,
    pub start_date: Option<CalendarDate>,
    pub end_date: Option<CalendarDate>,
    pub is_active: bool,
    pub is_archived: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CampaignRecord {
    pub fn status(&self, today: CalendarDate) -> CampaignStatus {
        CampaignStatus::derive(self.is_archived, self.is_active, self.end_date, today)
    }
}

fn corrupt(column: &'static str, value: impl Into<String>) -> StorageError {
    StorageError::Corrupt {
        column,
        value: value.into(),
    }
}

impl TryFrom<CampaignRow> for CampaignRecord {
    type Error = StorageError;

    fn try_from(row: CampaignRow) -> Result<Self, Self::Error> {
        let days = row
            .days_of_week
            .iter()
            .map(|d| Weekday::parse(d).ok_or_else(|| corrupt("campaigns.days_of_week", d.as_str())))
            .collect::<Result<Vec<_>, _>>()?;
        let frequency = Frequency::from_storage_str(&row.frequency)
            .ok_or_else(|| corrupt("campaigns.frequency", row.frequency.as_str()))?;
        let post_type = StoredPostType::parse(&row.post_type)
            .ok_or_else(|| corrupt("campaigns.post_type", row.post_type.as_str()))?;
        let post_length = PostLength::parse(&row.post_length)
            .ok_or_else(|| corrupt("campaigns.post_length", row.post_length.as_str()))?;
        let video_length = row
            .video_length
            .map(|secs| {
                VideoLength::from_seconds(i64::from(secs))
                    .ok_or_else(|| corrupt("campaigns.video_length", secs.to_string()))
            })
            .transpose()?;

        Ok(Self {
            id: row.id,
            creator_id: row.creator_id,
            title: row.title,
            objective: row.objective,
            narrative_context: row.narrative_context,
            cadence: Cadence::new(days, frequency),
            post_type,
            post_length,
            video_length,
            start_date: row.start_date,
            end_date: row.end_date,
            is_active: row.is_active,
            is_archived: row.is_archived,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Create input
// ---------------------------------------------------------------------------

/// Everything needed to insert a campaign and its relations in one
/// transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCampaign {
    pub creator_id: Option<String>,
    pub title: String,
    pub objective: String,
    pub narrative_context: Option<String>,
    pub cadence: Cadence,
    pub post_type: StoredPostType,
    pub post_length: PostLength,
    pub video_length: Option<VideoLength>,
    pub start_date: Option<CalendarDate>,
    pub end_date: Option<CalendarDate>,
    pub persona_keys: Vec<String>,
    pub character_ids: Vec<String>,
    pub merge_fields: Vec<CreateMergeField>,
}

impl CreateCampaign {
    /// Map a validated draft onto storage input.
    ///
    /// The UI post type is translated to its stored label, and merge fields
    /// keep their submission order through `sort_order`. New campaigns start
    /// inactive and unarchived (column defaults).
    pub fn from_draft(draft: CampaignDraft, creator_id: Option<String>) -> Self {
        let merge_fields = draft
            .merge_fields
            .unwrap_or_default()
            .into_iter()
            .zip(0..)
            .map(|(field, order)| CreateMergeField::from_draft(field, order))
            .collect();

        Self {
            creator_id,
            title: draft.title,
            objective: draft.objective,
            narrative_context: draft.narrative_context,
            cadence: draft.cadence,
            post_type: StoredPostType::from(draft.post_type),
            post_length: draft.post_length,
            video_length: draft.video_length,
            start_date: draft.start_date,
            end_date: draft.end_date,
            persona_keys: draft.personas,
            character_ids: draft.characters,
            merge_fields,
        }
    }

    /// Stored day tags, in canonical order.
    pub fn day_tags(&self) -> Vec<String> {
        self.cadence
            .days_of_week
            .iter()
            .map(|d| d.as_str().to_string())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Query filter
// ---------------------------------------------------------------------------

/// Filter for [`CampaignRepo::find_many`](crate::repositories::CampaignRepo::find_many).
#[derive(Debug, Clone)]
pub struct CampaignFilter {
    /// Include archived campaigns. Defaults to `true`.
    pub include_archived: bool,
    pub is_active: Option<bool>,
    /// Case-insensitive substring match on title or objective.
    pub search: Option<String>,
}

impl Default for CampaignFilter {
    fn default() -> Self {
        Self {
            include_archived: true,
            is_active: None,
            search: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// A campaign as the UI sees it: the record plus derived fields.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignView {
    #[serde(flatten)]
    pub record: CampaignRecord,
    pub status: CampaignStatus,
    /// `image`, `carousel` or `video`.
    pub ui_post_type: PostType,
    /// Human-readable cadence, e.g. `"on monday, friday every two weeks"`.
    pub schedule: String,
}

impl CampaignView {
    pub fn new(record: CampaignRecord, today: CalendarDate) -> Self {
        let status = record.status(today);
        let ui_post_type = record.post_type.to_ui();
        let schedule = record.cadence.summary();
        Self {
            record,
            status,
            ui_post_type,
            schedule,
        }
    }
}

// ---------------------------------------------------------------------------
// Stored aggregates
// ---------------------------------------------------------------------------
//
// What the repository returns and the API caches. Nothing here depends on
// the current date; status is derived only when a view is built.

/// A stored campaign with its live relation counts.
#[derive(Debug, Clone)]
pub struct CampaignSummary {
    pub record: CampaignRecord,
    pub persona_count: i64,
    pub character_count: i64,
}

impl TryFrom<CampaignCountsRow> for CampaignSummary {
    type Error = StorageError;

    fn try_from(row: CampaignCountsRow) -> Result<Self, Self::Error> {
        Ok(Self {
            record: CampaignRecord::try_from(row.campaign)?,
            persona_count: row.persona_count,
            character_count: row.character_count,
        })
    }
}

impl CampaignSummary {
    pub fn status(&self, today: CalendarDate) -> CampaignStatus {
        self.record.status(today)
    }

    /// The list row as of `today`.
    pub fn view(&self, today: CalendarDate) -> CampaignWithCounts {
        CampaignWithCounts {
            campaign: CampaignView::new(self.record.clone(), today),
            persona_count: self.persona_count,
            character_count: self.character_count,
        }
    }
}

/// A stored campaign with its relations resolved.
#[derive(Debug, Clone)]
pub struct CampaignAggregate {
    pub record: CampaignRecord,
    pub personas: Vec<Persona>,
    pub characters: Vec<CharacterWithImage>,
    pub merge_fields: Vec<MergeField>,
}

impl CampaignAggregate {
    /// The detail view as of `today`.
    pub fn view(&self, today: CalendarDate) -> CampaignDetail {
        CampaignDetail {
            campaign: CampaignView::new(self.record.clone(), today),
            personas: self.personas.clone(),
            characters: self.characters.clone(),
            merge_fields: self
                .merge_fields
                .iter()
                .cloned()
                .map(MergeFieldView::from)
                .collect(),
        }
    }
}

/// List row: a campaign view with live relation counts.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignWithCounts {
    #[serde(flatten)]
    pub campaign: CampaignView,
    pub persona_count: i64,
    pub character_count: i64,
}

/// Detail view: a campaign with its relations resolved.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignDetail {
    #[serde(flatten)]
    pub campaign: CampaignView,
    pub personas: Vec<Persona>,
    pub characters: Vec<CharacterWithImage>,
    pub merge_fields: Vec<MergeFieldView>,
}

/// A freshly created campaign with the relations written alongside it.
/// This is the payload handed to the notifier.
#[derive(Debug, Clone, Serialize)]
pub struct HydratedCampaign {
    #[serde(flatten)]
    pub campaign: CampaignRecord,
    pub persona_keys: Vec<String>,
    pub character_ids: Vec<String>,
    pub merge_fields: Vec<MergeField>,
}
