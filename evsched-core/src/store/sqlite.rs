//! SQLite-backed durable store.
//!
//! Events and participants live in two tables tied by an `ON DELETE CASCADE`
//! foreign key; every mutating call runs inside one transaction.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::EventStore;
use crate::error::{EvschedError, EvschedResult};
use crate::event::{parse_date, parse_time, Event, EventDraft, EventPatch, Importance, Recurrence};

const EVENT_COLUMNS: &str = "id, title, agenda, date, time, importance, location, \
     coordinator, recurrence, created_at, updated_at";

/// Durable store over a single SQLite connection.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens or creates the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> EvschedResult<Self> {
        Self::init(Connection::open(path)?)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> EvschedResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> EvschedResult<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> EvschedResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(lock_poisoned)
    }
}

impl EventStore for SqliteStore {
    fn add(&self, draft: EventDraft) -> EvschedResult<String> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        // uuid-v4 collisions are practically impossible; the primary-key
        // constraint turns one into a StoreUnavailable error.
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        tx.execute(
            "INSERT INTO events (id, title, agenda, date, time, importance, location, \
             coordinator, recurrence, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
            params![
                id,
                draft.title,
                draft.agenda,
                draft.date.format("%Y-%m-%d").to_string(),
                draft.time.format("%H:%M:%S").to_string(),
                draft.importance.as_str(),
                draft.location,
                draft.coordinator,
                draft.recurrence.as_str(),
                now,
            ],
        )?;
        insert_participants(&tx, &id, &draft.participants)?;

        tx.commit()?;
        Ok(id)
    }

    fn get(&self, id: &str) -> EvschedResult<Option<Event>> {
        let conn = self.lock()?;
        let row = query_event(&conn, id)?;
        let Some(row) = row else {
            return Ok(None);
        };
        let participants = load_participants(&conn, id)?;
        Ok(Some(decode_row(row, participants)?))
    }

    fn get_all(&self) -> EvschedResult<Vec<Event>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare(&format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY rowid ASC"))?;
        let mut rows = Vec::new();
        for row in stmt.query_map([], read_row)? {
            rows.push(row?);
        }
        drop(stmt);

        let mut events = Vec::with_capacity(rows.len());
        for row in rows {
            let participants = load_participants(&conn, &row.id)?;
            events.push(decode_row(row, participants)?);
        }
        Ok(events)
    }

    fn update(&self, id: &str, patch: EventPatch) -> EvschedResult<bool> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let Some(row) = query_event(&tx, id)? else {
            return Ok(false);
        };
        let participants = load_participants(&tx, id)?;
        let mut event = decode_row(row, participants)?;

        let replace_participants = patch.participants.is_some();
        event.apply(patch, Utc::now());

        tx.execute(
            "UPDATE events SET title = ?2, agenda = ?3, date = ?4, time = ?5, \
             importance = ?6, location = ?7, coordinator = ?8, recurrence = ?9, \
             updated_at = ?10 WHERE id = ?1",
            params![
                id,
                event.title,
                event.agenda,
                event.date.format("%Y-%m-%d").to_string(),
                event.time.format("%H:%M:%S").to_string(),
                event.importance.as_str(),
                event.location,
                event.coordinator,
                event.recurrence.as_str(),
                event.updated_at.to_rfc3339(),
            ],
        )?;
        if replace_participants {
            tx.execute("DELETE FROM participants WHERE event_id = ?1", params![id])?;
            insert_participants(&tx, id, &event.participants)?;
        }

        tx.commit()?;
        Ok(true)
    }

    fn delete(&self, id: &str) -> EvschedResult<bool> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let removed = tx.execute("DELETE FROM events WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(removed > 0)
    }
}

struct EventRow {
    id: String,
    title: String,
    agenda: Option<String>,
    date: String,
    time: String,
    importance: String,
    location: Option<String>,
    coordinator: String,
    recurrence: String,
    created_at: String,
    updated_at: String,
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<EventRow> {
    Ok(EventRow {
        id: row.get(0)?,
        title: row.get(1)?,
        agenda: row.get(2)?,
        date: row.get(3)?,
        time: row.get(4)?,
        importance: row.get(5)?,
        location: row.get(6)?,
        coordinator: row.get(7)?,
        recurrence: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

fn query_event(conn: &Connection, id: &str) -> EvschedResult<Option<EventRow>> {
    Ok(conn
        .query_row(
            &format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?1"),
            params![id],
            read_row,
        )
        .optional()?)
}

fn load_participants(conn: &Connection, event_id: &str) -> EvschedResult<Vec<String>> {
    let mut stmt =
        conn.prepare("SELECT name FROM participants WHERE event_id = ?1 ORDER BY id ASC")?;
    let mut names = Vec::new();
    for name in stmt.query_map(params![event_id], |row| row.get(0))? {
        names.push(name?);
    }
    Ok(names)
}

fn insert_participants(conn: &Connection, event_id: &str, names: &[String]) -> EvschedResult<()> {
    let mut stmt = conn.prepare("INSERT INTO participants (name, event_id) VALUES (?1, ?2)")?;
    for name in names {
        stmt.execute(params![name, event_id])?;
    }
    Ok(())
}

fn decode_row(row: EventRow, participants: Vec<String>) -> EvschedResult<Event> {
    Ok(Event {
        id: row.id,
        title: row.title,
        agenda: row.agenda,
        date: parse_date(&row.date)?,
        time: parse_time(&row.time)?,
        importance: Importance::parse(&row.importance)?,
        location: row.location,
        coordinator: row.coordinator,
        recurrence: Recurrence::parse(&row.recurrence)?,
        participants,
        created_at: parse_timestamp(&row.created_at)?,
        updated_at: parse_timestamp(&row.updated_at)?,
    })
}

fn parse_timestamp(value: &str) -> EvschedResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| EvschedError::StoreUnavailable(format!("corrupt timestamp: {value}")))
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
            agenda: Some("agenda".to_string()),
            date: NaiveDate::from_ymd_opt(2025, 10, 5).unwrap(),
            time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            importance: Importance::High,
            location: None,
            coordinator: "John Smith".to_string(),
            recurrence: Recurrence::Weekly,
            participants: vec!["Alice".to_string(), "Bob".to_string(), "Carol".to_string()],
        }
    }

    fn participant_rows(store: &SqliteStore, event_id: &str) -> i64 {
        let conn = store.conn.lock().unwrap();
        conn.query_row(
            "SELECT COUNT(*) FROM participants WHERE event_id = ?1",
            params![event_id],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn round_trips_a_full_event() {
        let store = SqliteStore::open_in_memory().unwrap();
        let id = store.add(draft("Team Meeting")).unwrap();

        let event = store.get(&id).unwrap().unwrap();
        assert_eq!(event.id, id);
        assert_eq!(event.title, "Team Meeting");
        assert_eq!(event.agenda.as_deref(), Some("agenda"));
        assert_eq!(event.importance, Importance::High);
        assert_eq!(event.recurrence, Recurrence::Weekly);
        assert_eq!(event.participants, vec!["Alice", "Bob", "Carol"]);
        assert_eq!(event.created_at, event.updated_at);
    }

    #[test]
    fn delete_cascades_to_participants() {
        let store = SqliteStore::open_in_memory().unwrap();
        let id = store.add(draft("doomed")).unwrap();
        assert_eq!(participant_rows(&store, &id), 3);

        assert!(store.delete(&id).unwrap());
        assert_eq!(participant_rows(&store, &id), 0);
        assert!(store.get(&id).unwrap().is_none());

        // second delete is a plain false
        assert!(!store.delete(&id).unwrap());
    }

    #[test]
    fn update_replaces_participants_wholesale() {
        let store = SqliteStore::open_in_memory().unwrap();
        let id = store.add(draft("meeting")).unwrap();

        let patch = EventPatch {
            participants: Some(vec!["Dave".to_string()]),
            ..EventPatch::default()
        };
        assert!(store.update(&id, patch).unwrap());

        let event = store.get(&id).unwrap().unwrap();
        assert_eq!(event.participants, vec!["Dave"]);
        assert_eq!(participant_rows(&store, &id), 1);
    }

    #[test]
    fn update_without_participants_leaves_them_alone() {
        let store = SqliteStore::open_in_memory().unwrap();
        let id = store.add(draft("meeting")).unwrap();

        let patch = EventPatch {
            title: Some("renamed".to_string()),
            ..EventPatch::default()
        };
        assert!(store.update(&id, patch).unwrap());

        let event = store.get(&id).unwrap().unwrap();
        assert_eq!(event.title, "renamed");
        assert_eq!(event.participants.len(), 3);
    }

    #[test]
    fn survives_reopen_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.db");

        let id = {
            let store = SqliteStore::open(&path).unwrap();
            store.add(draft("durable")).unwrap()
        };

        let store = SqliteStore::open(&path).unwrap();
        let event = store.get(&id).unwrap().unwrap();
        assert_eq!(event.title, "durable");
        assert_eq!(event.participants.len(), 3);
    }

    #[test]
    fn get_all_on_empty_store_is_empty() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.get_all().unwrap().is_empty());
    }
}
