//! Campaign domain enums, cadence, and status derivation.
//!
//! The UI and the database disagree on a few labels (the UI says `image`,
//! storage says `single_image`; the UI says `bi-weekly`, storage says
//! `bi_weekly`). Every such translation lives here as an exhaustive match so
//! that adding a variant is a compile error until both sides are handled.

use serde::{Deserialize, Serialize};

use crate::types::CalendarDate;

// ---------------------------------------------------------------------------
// Weekday
// ---------------------------------------------------------------------------

/// A day tag in a campaign's posting cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All seven days in canonical (Monday-first) order.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Lowercase tag, identical in the UI and in storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
            Self::Sunday => "sunday",
        }
    }

    /// Parse a day tag, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|day| day.as_str() == value)
    }
}

// ---------------------------------------------------------------------------
// Frequency
// ---------------------------------------------------------------------------

/// How often the weekly day pattern repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    #[serde(rename = "weekly")]
    Weekly,
    #[serde(rename = "bi-weekly")]
    BiWeekly,
}

impl Frequency {
    /// Label used by submissions and API responses.
    pub fn ui_label(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::BiWeekly => "bi-weekly",
        }
    }

    /// Value stored in `campaigns.frequency`.
    pub fn as_storage_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::BiWeekly => "bi_weekly",
        }
    }

    pub fn from_ui_label(value: &str) -> Option<Self> {
        match value {
            "weekly" => Some(Self::Weekly),
            "bi-weekly" => Some(Self::BiWeekly),
            _ => None,
        }
    }

    pub fn from_storage_str(value: &str) -> Option<Self> {
        match value {
            "weekly" => Some(Self::Weekly),
            "bi_weekly" => Some(Self::BiWeekly),
            _ => None,
        }
    }

    /// Phrase used in the human-readable schedule summary.
    fn repeat_phrase(self) -> &'static str {
        match self {
            Self::Weekly => "every week",
            Self::BiWeekly => "every two weeks",
        }
    }
}

// ---------------------------------------------------------------------------
// Cadence
// ---------------------------------------------------------------------------

/// Posting cadence: which days, and how often the pattern repeats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cadence {
    pub days_of_week: Vec<Weekday>,
    pub frequency: Frequency,
}

impl Cadence {
    /// Build a cadence with days de-duplicated and in canonical order.
    pub fn new(days: impl IntoIterator<Item = Weekday>, frequency: Frequency) -> Self {
        let mut days_of_week: Vec<Weekday> = days.into_iter().collect();
        days_of_week.sort();
        days_of_week.dedup();
        Self {
            days_of_week,
            frequency,
        }
    }

    /// True when every day of the week is selected.
    pub fn is_daily(&self) -> bool {
        Weekday::ALL.iter().all(|d| self.days_of_week.contains(d))
    }

    /// `"daily"` when all seven days are present, otherwise the day tags
    /// joined with commas.
    pub fn days_label(&self) -> String {
        if self.is_daily() {
            return "daily".to_string();
        }
        self.days_of_week
            .iter()
            .map(|d| d.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Human-readable schedule, e.g. `"on monday, wednesday every week"`.
    pub fn summary(&self) -> String {
        if self.days_of_week.is_empty() {
            return "no posting days".to_string();
        }
        let days = if self.is_daily() {
            "daily".to_string()
        } else {
            format!("on {}", self.days_label())
        };
        format!("{days} {}", self.frequency.repeat_phrase())
    }
}

// ---------------------------------------------------------------------------
// Post type
// ---------------------------------------------------------------------------

/// Post type as submitted by and shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostType {
    Image,
    Carousel,
    Video,
}

impl PostType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Carousel => "carousel",
            Self::Video => "video",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "image" => Some(Self::Image),
            "carousel" => Some(Self::Carousel),
            "video" => Some(Self::Video),
            _ => None,
        }
    }
}

/// Post type as persisted in `campaigns.post_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoredPostType {
    SingleImage,
    Carousel,
    Video,
}

impl StoredPostType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SingleImage => "single_image",
            Self::Carousel => "carousel",
            Self::Video => "video",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "single_image" => Some(Self::SingleImage),
            "carousel" => Some(Self::Carousel),
            "video" => Some(Self::Video),
            _ => None,
        }
    }

    /// Translate back to the UI label.
    pub fn to_ui(self) -> PostType {
        match self {
            Self::SingleImage => PostType::Image,
            Self::Carousel => PostType::Carousel,
            Self::Video => PostType::Video,
        }
    }
}

impl From<PostType> for StoredPostType {
    fn from(value: PostType) -> Self {
        match value {
            PostType::Image => Self::SingleImage,
            PostType::Carousel => Self::Carousel,
            PostType::Video => Self::Video,
        }
    }
}

// ---------------------------------------------------------------------------
// Post length / video length
// ---------------------------------------------------------------------------

/// Caption length bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostLength {
    Short,
    Medium,
    Long,
}

impl PostLength {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "short" => Some(Self::Short),
            "medium" => Some(Self::Medium),
            "long" => Some(Self::Long),
            _ => None,
        }
    }
}

/// Allowed video lengths. Serialized as the number of seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum VideoLength {
    Thirty,
    FortyFive,
    Sixty,
}

impl VideoLength {
    pub fn seconds(self) -> i32 {
        match self {
            Self::Thirty => 30,
            Self::FortyFive => 45,
            Self::Sixty => 60,
        }
    }

    pub fn from_seconds(seconds: i64) -> Option<Self> {
        match seconds {
            30 => Some(Self::Thirty),
            45 => Some(Self::FortyFive),
            60 => Some(Self::Sixty),
            _ => None,
        }
    }
}

impl From<VideoLength> for i32 {
    fn from(value: VideoLength) -> Self {
        value.seconds()
    }
}

impl TryFrom<i32> for VideoLength {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::from_seconds(i64::from(value))
            .ok_or_else(|| format!("unsupported video length: {value} seconds"))
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Administrative status shown in list and detail views. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Draft,
    Active,
    Completed,
    Archived,
}

impl CampaignStatus {
    /// Derive the status from stored lifecycle fields.
    ///
    /// Precedence: archived > draft > completed > active. A campaign whose
    /// end date is strictly before `today` is completed.
    pub fn derive(
        is_archived: bool,
        is_active: bool,
        end_date: Option<CalendarDate>,
        today: CalendarDate,
    ) -> Self {
        if is_archived {
            return Self::Archived;
        }
        if !is_active {
            return Self::Draft;
        }
        match end_date {
            Some(end) if end < today => Self::Completed,
            _ => Self::Active,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Archived => "archived",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(Self::Draft),
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
