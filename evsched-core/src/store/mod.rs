//! Record store: CRUD over events with owned participant lists.

pub mod memory;
pub mod sqlite;

use chrono::NaiveDate;

use crate::error::EvschedResult;
use crate::event::{Event, EventDraft, EventPatch};

/// Backend-agnostic contract for event persistence.
///
/// Mutating calls are atomic per call: an event and its participants are
/// always written or removed as one unit, and a reader never observes a
/// half-applied record. Any backend I/O failure surfaces as
/// `StoreUnavailable` with the pre-call state intact.
pub trait EventStore: Send + Sync {
    /// Persists a new event and returns its assigned id.
    fn add(&self, draft: EventDraft) -> EvschedResult<String>;

    /// Full snapshot of one event, participants and timestamps included.
    fn get(&self, id: &str) -> EvschedResult<Option<Event>>;

    /// All events, in store-defined order.
    fn get_all(&self) -> EvschedResult<Vec<Event>>;

    /// Merges populated patch fields into the stored event and refreshes
    /// `updated_at`. Returns false when the id is absent.
    fn update(&self, id: &str, patch: EventPatch) -> EvschedResult<bool>;

    /// Removes an event and all its participants. Returns false when absent.
    fn delete(&self, id: &str) -> EvschedResult<bool>;

    /// Events with a date in `[start, end]`.
    fn events_between(&self, start: NaiveDate, end: NaiveDate) -> EvschedResult<Vec<Event>> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|event| event.date >= start && event.date <= end)
            .collect())
    }

    /// Events whose coordinator contains `needle`, case-insensitively.
    fn events_by_coordinator(&self, needle: &str) -> EvschedResult<Vec<Event>> {
        let needle = needle.to_lowercase();
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|event| event.coordinator.to_lowercase().contains(&needle))
            .collect())
    }

    /// Events whose title, agenda or location contains `needle`,
    /// case-insensitively.
    fn search(&self, needle: &str) -> EvschedResult<Vec<Event>> {
        let needle = needle.to_lowercase();
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|event| {
                event.title.to_lowercase().contains(&needle)
                    || event
                        .agenda
                        .as_deref()
                        .is_some_and(|agenda| agenda.to_lowercase().contains(&needle))
                    || event
                        .location
                        .as_deref()
                        .is_some_and(|location| location.to_lowercase().contains(&needle))
            })
            .collect())
    }
}
