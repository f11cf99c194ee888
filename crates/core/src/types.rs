/// Primary keys for campaigns, characters, assets and merge fields are
/// PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates (campaign start/end) carry no time zone.
pub type CalendarDate = chrono::NaiveDate;
