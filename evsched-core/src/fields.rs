//! The flat field mapping shared by both wire protocols.
//!
//! Both codecs decode into [`EventFields`] — every value still a raw string —
//! and all validation happens in [`EventFields::into_draft`] and
//! [`EventFields::into_patch`], before any store call is made.

use serde::{Deserialize, Deserializer};

use crate::error::{EvschedError, EvschedResult};
use crate::event::{parse_date, parse_time, EventDraft, EventPatch, Importance, Recurrence};

/// Raw event fields as they appear on the wire.
///
/// `agenda` and `location` are doubly optional: the outer level is presence
/// in the payload, the inner level is an explicit null/empty value that
/// clears the stored field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EventFields {
    pub id: Option<String>,
    pub title: Option<String>,
    #[serde(deserialize_with = "double_option")]
    pub agenda: Option<Option<String>>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub importance: Option<String>,
    #[serde(deserialize_with = "double_option")]
    pub location: Option<Option<String>>,
    pub coordinator: Option<String>,
    pub recurrence: Option<String>,
    pub participants: Option<Vec<String>>,
}

impl EventFields {
    /// Validate into a complete new event.
    ///
    /// `title`, `date`, `time` and `coordinator` are required; importance
    /// and recurrence fall back to their defaults when absent.
    pub fn into_draft(self) -> EvschedResult<EventDraft> {
        let title = self.title.ok_or(EvschedError::MissingField("title"))?;
        let date = parse_date(&self.date.ok_or(EvschedError::MissingField("date"))?)?;
        let time = parse_time(&self.time.ok_or(EvschedError::MissingField("time"))?)?;
        let coordinator = self
            .coordinator
            .ok_or(EvschedError::MissingField("coordinator"))?;
        let importance = match self.importance {
            Some(value) => Importance::parse(&value)?,
            None => Importance::default(),
        };
        let recurrence = match self.recurrence {
            Some(value) => Recurrence::parse(&value)?,
            None => Recurrence::default(),
        };

        Ok(EventDraft {
            title,
            agenda: self.agenda.flatten(),
            date,
            time,
            importance,
            location: self.location.flatten(),
            coordinator,
            recurrence,
            participants: clean_participants(self.participants.unwrap_or_default()),
        })
    }

    /// Validate into a partial update; only fields present on the wire are
    /// populated.
    pub fn into_patch(self) -> EvschedResult<EventPatch> {
        Ok(EventPatch {
            title: self.title,
            agenda: self.agenda,
            date: self.date.as_deref().map(parse_date).transpose()?,
            time: self.time.as_deref().map(parse_time).transpose()?,
            importance: self
                .importance
                .as_deref()
                .map(Importance::parse)
                .transpose()?,
            location: self.location,
            coordinator: self.coordinator,
            recurrence: self
                .recurrence
                .as_deref()
                .map(Recurrence::parse)
                .transpose()?,
            participants: self.participants.map(clean_participants),
        })
    }
}

/// Blank names are dropped rather than rejected.
fn clean_participants(names: Vec<String>) -> Vec<String> {
    names
        .into_iter()
        .filter(|name| !name.trim().is_empty())
        .collect()
}

/// Present-but-null deserializes as `Some(None)`; an absent field stays
/// `None` via the struct-level default.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}
