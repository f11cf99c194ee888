//! Campaign submission validation.
//!
//! [`validate_submission`] is the only entry point that turns untrusted form
//! input into a [`CampaignDraft`]. It never stops at the first problem: every
//! violated rule is reported as a [`FieldError`] so the caller can surface
//! them all at once. Everything downstream takes the typed draft only.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::campaign::{Cadence, Frequency, PostLength, PostType, VideoLength, Weekday};
use crate::merge_field::MergeFieldValueType;
use crate::types::CalendarDate;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A single rule violation, keyed by the submission's field path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Path in the submission, e.g. `cadence.daysOfWeek` or `mergeFields[1].mergeField`.
    pub field: String,
    pub message: String,
}

/// Every violation found in one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// True if any violation is reported against `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} field(s) failed validation", self.0.len())?;
        for (i, err) in self.0.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{}: {}", err.field, err.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

// ---------------------------------------------------------------------------
// Draft
// ---------------------------------------------------------------------------

/// A validated campaign submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignDraft {
    pub title: String,
    pub objective: String,
    pub narrative_context: Option<String>,
    pub post_length: PostLength,
    pub start_date: Option<CalendarDate>,
    pub end_date: Option<CalendarDate>,
    pub cadence: Cadence,
    pub post_type: PostType,
    pub video_length: Option<VideoLength>,
    /// Persona keys, de-duplicated, in submission order.
    pub personas: Vec<String>,
    /// Character ids, de-duplicated, in submission order.
    pub characters: Vec<String>,
    /// `None` when the submission carried no merge-field list at all.
    pub merge_fields: Option<Vec<MergeFieldDraft>>,
}

impl CampaignDraft {
    /// True when both dates are present and the end precedes the start.
    pub fn has_reversed_dates(&self) -> bool {
        matches!((self.start_date, self.end_date), (Some(start), Some(end)) if end < start)
    }
}

/// A validated merge field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeFieldDraft {
    pub name: String,
    pub description: Option<String>,
    pub value_type: MergeFieldValueType,
    pub default_value: Option<String>,
    pub start_time: i32,
    pub end_time: i32,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Validate an untyped campaign submission.
///
/// Field names follow the campaign form (`title`, `objective`,
/// `narrativeContext`, `postLength`, `startDate`, `endDate`, `cadence`,
/// `postType`, `videoLength`, `personas`, `characters`, `mergeFields`).
pub fn validate_submission(input: &Value) -> Result<CampaignDraft, ValidationErrors> {
    let Some(obj) = input.as_object() else {
        let mut errors = ValidationErrors::new();
        errors.push("submission", "Submission must be a JSON object");
        return Err(errors);
    };

    let mut v = Fields::new(obj);

    let title = v.required_text("title", "Title is required");
    let objective = v.required_text("objective", "Objective is required");
    let narrative_context = v.optional_text("narrativeContext");
    let post_length = v.post_length();
    let start_date = v.optional_date("startDate");
    let end_date = v.optional_date("endDate");
    let cadence = v.cadence();
    let post_type = v.post_type();
    let video_length = v.video_length();
    let personas = v.personas();
    let characters = v.characters();
    let merge_fields = v.merge_fields();

    let errors = v.errors;
    match (title, objective, post_length, cadence, post_type, personas, characters) {
        (
            Some(title),
            Some(objective),
            Some(post_length),
            Some(cadence),
            Some(post_type),
            Some(personas),
            Some(characters),
        ) if errors.is_empty() => Ok(CampaignDraft {
            title,
            objective,
            narrative_context,
            post_length,
            start_date,
            end_date,
            cadence,
            post_type,
            video_length,
            personas,
            characters,
            merge_fields,
        }),
        _ => Err(errors),
    }
}

// ---------------------------------------------------------------------------
// Field readers
// ---------------------------------------------------------------------------

struct Fields<'a> {
    obj: &'a Map<String, Value>,
    errors: ValidationErrors,
}

impl<'a> Fields<'a> {
    fn new(obj: &'a Map<String, Value>) -> Self {
        Self {
            obj,
            errors: ValidationErrors::new(),
        }
    }

    fn required_text(&mut self, key: &str, missing: &str) -> Option<String> {
        match self.obj.get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Some(Value::String(_)) | Some(Value::Null) | None => {
                self.errors.push(key, missing);
                None
            }
            Some(_) => {
                self.errors.push(key, "Must be a string");
                None
            }
        }
    }

    fn optional_text(&mut self, key: &str) -> Option<String> {
        read_optional_text(self.obj, key, key, &mut self.errors)
    }

    fn optional_date(&mut self, key: &str) -> Option<CalendarDate> {
        let raw = self.optional_text(key)?;
        match parse_date(&raw) {
            Some(date) => Some(date),
            None => {
                self.errors
                    .push(key, format!("Invalid date '{raw}', expected YYYY-MM-DD"));
                None
            }
        }
    }

    fn post_length(&mut self) -> Option<PostLength> {
        let raw = self.required_text("postLength", "Post length is required")?;
        let parsed = PostLength::parse(&raw.to_ascii_lowercase());
        if parsed.is_none() {
            self.errors
                .push("postLength", "Post length must be one of short, medium, long");
        }
        parsed
    }

    fn cadence(&mut self) -> Option<Cadence> {
        let Some(cadence) = self.obj.get("cadence").and_then(Value::as_object) else {
            self.errors.push("cadence", "Cadence is required");
            return None;
        };

        let mut days = Vec::new();
        let mut days_ok = true;
        match cadence.get("daysOfWeek").and_then(Value::as_array) {
            Some(entries) if !entries.is_empty() => {
                for (i, entry) in entries.iter().enumerate() {
                    match entry.as_str().and_then(Weekday::parse) {
                        Some(day) => days.push(day),
                        None => {
                            days_ok = false;
                            self.errors.push(
                                format!("cadence.daysOfWeek[{i}]"),
                                format!("Unknown day of week: {entry}"),
                            );
                        }
                    }
                }
            }
            _ => {
                days_ok = false;
                self.errors
                    .push("cadence.daysOfWeek", "Select at least one day");
            }
        }

        let frequency = cadence
            .get("frequency")
            .and_then(Value::as_str)
            .and_then(Frequency::from_ui_label);
        if frequency.is_none() {
            self.errors
                .push("cadence.frequency", "Frequency must be weekly or bi-weekly");
        }

        match frequency {
            Some(frequency) if days_ok => Some(Cadence::new(days, frequency)),
            _ => None,
        }
    }

    fn post_type(&mut self) -> Option<PostType> {
        let raw = self.required_text("postType", "Post type is required")?;
        let parsed = PostType::parse(&raw);
        if parsed.is_none() {
            self.errors
                .push("postType", "Post type must be one of image, carousel, video");
        }
        parsed
    }

    fn video_length(&mut self) -> Option<VideoLength> {
        let value = self.obj.get("videoLength").filter(|v| !v.is_null())?;
        let parsed = value.as_i64().and_then(VideoLength::from_seconds);
        if parsed.is_none() {
            self.errors
                .push("videoLength", "Video length must be 30, 45, or 60 seconds");
        }
        parsed
    }

    fn personas(&mut self) -> Option<Vec<String>> {
        self.references("personas", "Select at least one persona", "Persona")
    }

    fn characters(&mut self) -> Option<Vec<String>> {
        self.references("characters", "Select at least one character", "Character")
    }

    /// A non-empty list of opaque string ids, de-duplicated in order.
    fn references(&mut self, key: &str, missing: &str, noun: &str) -> Option<Vec<String>> {
        let entries = self.non_empty_list(key, missing)?;
        let mut ids = Vec::with_capacity(entries.len());
        let mut ok = true;
        for (i, entry) in entries.iter().enumerate() {
            match entry.as_str().map(str::trim).filter(|s| !s.is_empty()) {
                Some(id) => ids.push(id.to_string()),
                None => {
                    ok = false;
                    self.errors.push(
                        format!("{key}[{i}]"),
                        format!("{noun} reference must be a non-empty string"),
                    );
                }
            }
        }
        ok.then(|| dedupe(ids))
    }

    fn non_empty_list(&mut self, key: &str, missing: &str) -> Option<&'a Vec<Value>> {
        let obj = self.obj;
        match obj.get(key).and_then(Value::as_array) {
            Some(entries) if !entries.is_empty() => Some(entries),
            _ => {
                self.errors.push(key, missing);
                None
            }
        }
    }

    fn merge_fields(&mut self) -> Option<Vec<MergeFieldDraft>> {
        let value = self.obj.get("mergeFields").filter(|v| !v.is_null())?;
        let Some(entries) = value.as_array() else {
            self.errors.push("mergeFields", "Merge fields must be a list");
            return None;
        };

        let mut fields = Vec::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            let prefix = format!("mergeFields[{i}]");
            let Some(obj) = entry.as_object() else {
                self.errors.push(prefix, "Merge field must be an object");
                continue;
            };
            if let Some(field) = merge_field(obj, &prefix, &mut self.errors) {
                fields.push(field);
            }
        }
        Some(fields)
    }
}

fn merge_field(
    obj: &Map<String, Value>,
    prefix: &str,
    errors: &mut ValidationErrors,
) -> Option<MergeFieldDraft> {
    let before = errors.len();

    let name = ["mergeField", "name"]
        .iter()
        .find_map(|k| obj.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    if name.is_none() {
        errors.push(format!("{prefix}.mergeField"), "Merge field name is required");
    }

    let description =
        read_optional_text(obj, "description", &format!("{prefix}.description"), errors);

    let value_type = match obj.get("valueType").and_then(Value::as_str) {
        None => Some(MergeFieldValueType::default()),
        Some(raw) => {
            let parsed = MergeFieldValueType::parse(raw);
            if parsed.is_none() {
                errors.push(
                    format!("{prefix}.valueType"),
                    format!("Unknown value type '{raw}'"),
                );
            }
            parsed
        }
    };

    let default_value_key = if obj.contains_key("defaultValue") {
        "defaultValue"
    } else {
        "value"
    };
    let default_value = read_optional_text(
        obj,
        default_value_key,
        &format!("{prefix}.{default_value_key}"),
        errors,
    );

    let start_time = offset_secs(obj, "startTime", prefix, errors);
    let end_time = offset_secs(obj, "endTime", prefix, errors);
    if let (Some(start), Some(end)) = (start_time, end_time) {
        if end < start {
            errors.push(
                format!("{prefix}.endTime"),
                "End time must not be earlier than start time",
            );
        }
    }

    match (name, value_type, start_time, end_time) {
        (Some(name), Some(value_type), Some(start_time), Some(end_time))
            if errors.len() == before =>
        {
            Some(MergeFieldDraft {
                name,
                description,
                value_type,
                default_value,
                start_time,
                end_time,
            })
        }
        _ => None,
    }
}

/// Read a whole-second offset. Absent means zero; the form sends strings.
fn offset_secs(
    obj: &Map<String, Value>,
    key: &str,
    prefix: &str,
    errors: &mut ValidationErrors,
) -> Option<i32> {
    let parsed = match obj.get(key) {
        None | Some(Value::Null) => return Some(0),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Some(Value::String(s)) if s.trim().is_empty() => return Some(0),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(_) => None,
    };
    match parsed.and_then(|secs| i32::try_from(secs).ok()).filter(|s| *s >= 0) {
        Some(secs) => Some(secs),
        None => {
            errors.push(
                format!("{prefix}.{key}"),
                "Must be a non-negative whole number of seconds",
            );
            None
        }
    }
}

fn read_optional_text(
    obj: &Map<String, Value>,
    key: &str,
    path: &str,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match obj.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::String(_)) | Some(Value::Null) | None => None,
        Some(_) => {
            errors.push(path, "Must be a string");
            None
        }
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp (date part is kept).
fn parse_date(raw: &str) -> Option<CalendarDate> {
    CalendarDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
        chrono::DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.date_naive())
    })
}

fn dedupe<T: PartialEq>(items: Vec<T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
