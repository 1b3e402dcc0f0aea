//! Event model and validation.
//!
//! Incoming records arrive as loosely-typed [`EventDraft`]s (straight from JSON).
//! [`validate_event`] is the only path from a draft to a typed [`NewEvent`], and a
//! store turns a `NewEvent` into an [`Event`] by assigning it an [`EventId`].
//! `Event` fields are private, so every `Event` in existence satisfies:
//!
//! - the title is non-blank;
//! - `start_time < end_time`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{EngineError, Result};

pub const TITLE_REQUIRED: &str = "Title is required and must be a non-empty string";
pub const START_REQUIRED: &str = "Start time is required";
pub const START_INVALID: &str = "Start time must be a valid date";
pub const END_REQUIRED: &str = "End time is required";
pub const END_INVALID: &str = "End time must be a valid date";
pub const END_BEFORE_START: &str = "End time must be after start time";
pub const DESCRIPTION_NOT_STRING: &str = "Description must be a string";

/// Naive layouts accepted in addition to RFC 3339. Parsed as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Opaque identifier assigned by a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// A fresh random (v4) id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for EventId {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| EngineError::InvalidId(s.to_string()))
    }
}

/// A validated calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "EventRecord")]
pub struct Event {
    id: EventId,
    title: String,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl Event {
    /// Build an event with a fresh id.
    ///
    /// # Errors
    /// Returns `EngineError::Validation` if the title is blank or
    /// `start_time >= end_time`.
    pub fn new(
        title: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Self> {
        Ok(NewEvent::new(title, start_time, end_time, None)?.into_event(EventId::new()))
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn id(&self) -> EventId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Always strictly positive.
    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }
}

/// Wire shape used to re-validate events on deserialization.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventRecord {
    id: EventId,
    title: String,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    #[serde(default)]
    description: Option<String>,
}

impl TryFrom<EventRecord> for Event {
    type Error = EngineError;

    fn try_from(record: EventRecord) -> Result<Self> {
        NewEvent::new(
            record.title,
            record.start_time,
            record.end_time,
            record.description,
        )
        .map(|new_event| new_event.into_event(record.id))
    }
}

/// A validated event that has not been stored yet (no id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    title: String,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    description: Option<String>,
}

impl NewEvent {
    fn new(
        title: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        description: Option<String>,
    ) -> Result<Self> {
        let title = title.into();
        let mut errors = Vec::new();
        if title.trim().is_empty() {
            errors.push(TITLE_REQUIRED.to_string());
        }
        if start_time >= end_time {
            errors.push(END_BEFORE_START.to_string());
        }
        if !errors.is_empty() {
            return Err(EngineError::Validation(errors));
        }

        Ok(Self {
            title: title.trim().to_string(),
            start_time,
            end_time,
            description,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    /// Attach an id, producing a stored [`Event`].
    pub fn into_event(self, id: EventId) -> Event {
        Event {
            id,
            title: self.title,
            start_time: self.start_time,
            end_time: self.end_time,
            description: self.description,
        }
    }
}

/// An unvalidated event record, exactly as supplied by a client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
}

impl From<&Event> for EventDraft {
    fn from(event: &Event) -> Self {
        Self {
            title: Some(Value::String(event.title.clone())),
            start_time: Some(Value::String(event.start_time.to_rfc3339())),
            end_time: Some(Value::String(event.end_time.to_rfc3339())),
            description: event.description.clone().map(Value::String),
        }
    }
}

/// A partial update. Absent (or `null`) fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
            && self.description.is_none()
    }

    /// Overlay this patch on `event`, producing a draft that still needs validation.
    pub fn apply_to(&self, event: &Event) -> EventDraft {
        let base = EventDraft::from(event);
        EventDraft {
            title: self.title.clone().or(base.title),
            start_time: self.start_time.clone().or(base.start_time),
            end_time: self.end_time.clone().or(base.end_time),
            description: self.description.clone().or(base.description),
        }
    }
}

/// Validate a draft, collecting every problem rather than stopping at the first.
///
/// # Errors
/// Returns `EngineError::Validation` with one message per failed check.
pub fn validate_event(draft: &EventDraft) -> Result<NewEvent> {
    let mut errors = Vec::new();

    let title = match draft.title.as_ref() {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => {
            errors.push(TITLE_REQUIRED.to_string());
            None
        }
    };

    let start_time = check_instant(
        draft.start_time.as_ref(),
        START_REQUIRED,
        START_INVALID,
        &mut errors,
    );
    let end_time = check_instant(
        draft.end_time.as_ref(),
        END_REQUIRED,
        END_INVALID,
        &mut errors,
    );

    if let (Some(start), Some(end)) = (start_time, end_time) {
        if start >= end {
            errors.push(END_BEFORE_START.to_string());
        }
    }

    let description = match draft.description.as_ref() {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(DESCRIPTION_NOT_STRING.to_string());
            None
        }
    };

    match (title, start_time, end_time) {
        (Some(title), Some(start_time), Some(end_time)) if errors.is_empty() => Ok(NewEvent {
            title,
            start_time,
            end_time,
            description,
        }),
        _ => Err(EngineError::Validation(errors)),
    }
}

fn check_instant(
    value: Option<&Value>,
    required: &str,
    invalid: &str,
    errors: &mut Vec<String>,
) -> Option<DateTime<Utc>> {
    match value {
        None | Some(Value::Null) => {
            errors.push(required.to_string());
            None
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            errors.push(required.to_string());
            None
        }
        Some(value) => {
            let parsed = parse_instant(value);
            if parsed.is_none() {
                errors.push(invalid.to_string());
            }
            parsed
        }
    }
}

/// Interpret a JSON value as an instant.
///
/// Strings may be RFC 3339, a naive `YYYY-MM-DD[T| ]HH:MM[:SS[.f]]` (UTC), or a
/// bare `YYYY-MM-DD` (midnight UTC). Integers are Unix epoch milliseconds.
pub fn parse_instant(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_instant_str(s),
        Value::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    }
}

fn parse_instant_str(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn parses_rfc3339_with_offset() {
        let parsed = parse_instant(&json!("2026-01-15T10:00:00+02:00")).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 1, 15, 8, 0, 0).unwrap());
    }

    #[test]
    fn parses_naive_layouts_as_utc() {
        let expected = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        for input in [
            "2026-01-15 10:00",
            "2026-01-15 10:00:00",
            "2026-01-15T10:00",
            "2026-01-15T10:00:00",
            "2026-01-15T10:00:00.000",
        ] {
            assert_eq!(parse_instant(&json!(input)), Some(expected), "{input}");
        }
    }

    #[test]
    fn parses_bare_date_as_midnight() {
        let parsed = parse_instant(&json!("2026-01-15")).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn parses_epoch_millis() {
        let parsed = parse_instant(&json!(1_768_471_200_000_i64)).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap());
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_instant(&json!("not-a-date")), None);
        assert_eq!(parse_instant(&json!("2026-13-45 10:00")), None);
        assert_eq!(parse_instant(&json!(true)), None);
        assert_eq!(parse_instant(&json!({"when": "now"})), None);
        assert_eq!(parse_instant(&json!(1.5)), None);
    }

    #[test]
    fn event_id_roundtrips_through_display() {
        let id = EventId::new();
        assert_eq!(id.to_string().parse::<EventId>().unwrap(), id);
        assert!(matches!(
            "507f1f77bcf86cd799439011".parse::<EventId>(),
            Err(EngineError::InvalidId(_))
        ));
    }
}
