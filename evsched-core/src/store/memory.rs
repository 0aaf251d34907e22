//! Volatile in-memory store backend.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use uuid::Uuid;

use super::EventStore;
use crate::error::{EvschedError, EvschedResult};
use crate::event::{Event, EventDraft, EventPatch};

/// Map-backed store; `get_all` returns insertion order.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    events: HashMap<String, Event>,
    order: Vec<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventStore for MemoryStore {
    fn add(&self, draft: EventDraft) -> EvschedResult<String> {
        let mut inner = self.inner.lock().map_err(lock_poisoned)?;
        let id = Uuid::new_v4().to_string();
        if inner.events.contains_key(&id) {
            return Err(EvschedError::StoreUnavailable(format!(
                "id collision: {id}"
            )));
        }
        let event = draft.into_event(id.clone(), Utc::now());
        inner.order.push(id.clone());
        inner.events.insert(id.clone(), event);
        Ok(id)
    }

    fn get(&self, id: &str) -> EvschedResult<Option<Event>> {
        let inner = self.inner.lock().map_err(lock_poisoned)?;
        Ok(inner.events.get(id).cloned())
    }

    fn get_all(&self) -> EvschedResult<Vec<Event>> {
        let inner = self.inner.lock().map_err(lock_poisoned)?;
        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.events.get(id).cloned())
            .collect())
    }

    fn update(&self, id: &str, patch: EventPatch) -> EvschedResult<bool> {
        let mut inner = self.inner.lock().map_err(lock_poisoned)?;
        match inner.events.get_mut(id) {
            Some(event) => {
                event.apply(patch, Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete(&self, id: &str) -> EvschedResult<bool> {
        let mut inner = self.inner.lock().map_err(lock_poisoned)?;
        if inner.events.remove(id).is_none() {
            return Ok(false);
        }
        inner.order.retain(|stored| stored != id);
        Ok(true)
    }
}

fn lock_poisoned<T>(_: PoisonError<T>) -> EvschedError {
    EvschedError::StoreUnavailable("store lock poisoned".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn draft(title: &str) -> EventDraft {
        EventDraft {
            title: title.to_string(),
            agenda: None,
            date: NaiveDate::from_ymd_opt(2025, 10, 5).unwrap(),
            time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            importance: Default::default(),
            location: None,
            coordinator: "John Smith".to_string(),
            recurrence: Default::default(),
            participants: vec!["Alice".to_string(), "Bob".to_string()],
        }
    }

    #[test]
    fn add_assigns_unique_ids() {
        let store = MemoryStore::new();
        let mut ids = std::collections::HashSet::new();
        for i in 0..50 {
            let id = store.add(draft(&format!("event {i}"))).unwrap();
            assert!(!id.is_empty());
            assert!(ids.insert(id));
        }
    }

    #[test]
    fn get_all_preserves_insertion_order() {
        let store = MemoryStore::new();
        store.add(draft("first")).unwrap();
        store.add(draft("second")).unwrap();
        store.add(draft("third")).unwrap();

        let titles: Vec<String> = store
            .get_all()
            .unwrap()
            .into_iter()
            .map(|event| event.title)
            .collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[test]
    fn delete_is_idempotent() {
        let store = MemoryStore::new();
        let id = store.add(draft("doomed")).unwrap();
        assert!(store.delete(&id).unwrap());
        assert!(!store.delete(&id).unwrap());
        assert!(store.get(&id).unwrap().is_none());
    }

    #[test]
    fn update_absent_id_is_false_not_error() {
        let store = MemoryStore::new();
        assert!(!store.update("no-such-id", EventPatch::default()).unwrap());
    }

    #[test]
    fn partial_update_advances_updated_at_only() {
        let store = MemoryStore::new();
        let id = store.add(draft("meeting")).unwrap();
        let before = store.get(&id).unwrap().unwrap();

        std::thread::sleep(std::time::Duration::from_millis(5));
        let patch = EventPatch {
            title: Some("renamed".to_string()),
            ..EventPatch::default()
        };
        assert!(store.update(&id, patch).unwrap());

        let after = store.get(&id).unwrap().unwrap();
        assert_eq!(after.title, "renamed");
        assert_eq!(after.coordinator, before.coordinator);
        assert_eq!(after.participants, before.participants);
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at > before.updated_at);
    }

    #[test]
    fn update_with_empty_participants_clears_the_list() {
        let store = MemoryStore::new();
        let id = store.add(draft("meeting")).unwrap();

        let patch = EventPatch {
            participants: Some(Vec::new()),
            ..EventPatch::default()
        };
        assert!(store.update(&id, patch).unwrap());
        assert!(store.get(&id).unwrap().unwrap().participants.is_empty());
    }

    #[test]
    fn query_helpers_filter_case_insensitively() {
        let store = MemoryStore::new();
        let mut d = draft("Team Sync");
        d.location = Some("Berlin Office".to_string());
        store.add(d).unwrap();
        store.add(draft("Retro")).unwrap();

        let by_coordinator = store.events_by_coordinator("john").unwrap();
        assert_eq!(by_coordinator.len(), 2);

        let found = store.search("berlin").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Team Sync");

        let ranged = store
            .events_between(
                NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 10, 31).unwrap(),
            )
            .unwrap();
        assert_eq!(ranged.len(), 2);
    }
}
