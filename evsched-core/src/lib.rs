//! Core of the event scheduling service.
//!
//! This crate provides everything below the HTTP layer:
//! - `event` — the canonical `Event` record and its partial-update types
//! - `fields` — the flat wire field mapping shared by both protocols
//! - `store` — the `EventStore` contract with in-memory and SQLite backends
//! - `envelope` — the SOAP envelope codec (decode requests, encode
//!   responses and faults)
//! - `gateway` — the dispatcher tying codec and store together

pub mod envelope;
pub mod error;
pub mod event;
pub mod fields;
pub mod gateway;
pub mod store;

pub use error::{EvschedError, EvschedResult};
pub use event::{Event, EventDraft, EventPatch, Importance, Recurrence};
pub use fields::EventFields;
pub use gateway::{EnvelopeResponse, Gateway};
pub use store::{memory::MemoryStore, sqlite::SqliteStore, EventStore};
