//! Canonical event record types.
//!
//! `Event` is the full stored record. `EventDraft` is a validated new event
//! before the store assigns an id and timestamps, and `EventPatch` is a
//! field-present partial update: only populated fields are merged.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EvschedError, EvschedResult};

/// How important an event is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Low,
    #[default]
    Medium,
    High,
}

impl Importance {
    pub fn parse(value: &str) -> EvschedResult<Self> {
        match value {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(EvschedError::InvalidField {
                field: "importance",
                value: value.to_string(),
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// How often an event repeats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Annually,
}

impl Recurrence {
    pub fn parse(value: &str) -> EvschedResult<Self> {
        match value {
            "none" => Ok(Self::None),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "annually" => Ok(Self::Annually),
            _ => Err(EvschedError::InvalidField {
                field: "recurrence",
                value: value.to_string(),
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Annually => "annually",
        }
    }
}

/// Parse a wire date (`YYYY-MM-DD`).
pub fn parse_date(value: &str) -> EvschedResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| EvschedError::InvalidFormat {
        field: "date",
        value: value.to_string(),
    })
}

/// Parse a wire time (`HH:MM:SS`).
pub fn parse_time(value: &str) -> EvschedResult<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M:%S").map_err(|_| EvschedError::InvalidFormat {
        field: "time",
        value: value.to_string(),
    })
}

/// A scheduled event, as stored.
///
/// `id`, `created_at` and `updated_at` are owned by the store and never
/// client-settable. Participants are an ordered list of names with no
/// identity of their own; they live and die with the event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub agenda: Option<String>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub importance: Importance,
    pub location: Option<String>,
    pub coordinator: String,
    pub recurrence: Recurrence,
    pub participants: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Merge a patch: only populated fields change, the participant list is
    /// replaced wholesale when present, and `updated_at` is refreshed.
    /// `id` and `created_at` are untouched.
    pub fn apply(&mut self, patch: EventPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(agenda) = patch.agenda {
            self.agenda = agenda;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(time) = patch.time {
            self.time = time;
        }
        if let Some(importance) = patch.importance {
            self.importance = importance;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(coordinator) = patch.coordinator {
            self.coordinator = coordinator;
        }
        if let Some(recurrence) = patch.recurrence {
            self.recurrence = recurrence;
        }
        if let Some(participants) = patch.participants {
            self.participants = participants;
        }
        self.updated_at = now;
    }
}

/// A validated new event, before the store assigns an id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub title: String,
    pub agenda: Option<String>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub importance: Importance,
    pub location: Option<String>,
    pub coordinator: String,
    pub recurrence: Recurrence,
    pub participants: Vec<String>,
}

impl EventDraft {
    /// Materialize the draft into a stored record.
    pub fn into_event(self, id: String, now: DateTime<Utc>) -> Event {
        Event {
            id,
            title: self.title,
            agenda: self.agenda,
            date: self.date,
            time: self.time,
            importance: self.importance,
            location: self.location,
            coordinator: self.coordinator,
            recurrence: self.recurrence,
            participants: self.participants,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Field-present partial update.
///
/// `None` means "leave unchanged". For the clearable text fields (`agenda`,
/// `location`) the inner `Option` distinguishes clearing the stored value
/// from setting a new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub agenda: Option<Option<String>>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub importance: Option<Importance>,
    pub location: Option<Option<String>>,
    pub coordinator: Option<String>,
    pub recurrence: Option<Recurrence>,
    pub participants: Option<Vec<String>>,
}
