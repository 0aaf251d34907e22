//! The dispatcher: raw envelope request in, raw envelope response out.

use std::sync::Arc;

use crate::envelope::{
    decode_request, encode_bool_response, encode_event_response, encode_events_response,
    encode_fault, encode_id_response, EnvelopeRequest, Operation,
};
use crate::error::{EvschedError, EvschedResult};
use crate::store::EventStore;

/// A rendered envelope response plus whether it reports a server-side error.
#[derive(Debug, Clone)]
pub struct EnvelopeResponse {
    pub xml: String,
    pub server_error: bool,
}

/// Request-scoped protocol gateway over a shared store.
///
/// Stateless between requests; all durable state lives in the store.
#[derive(Clone)]
pub struct Gateway {
    store: Arc<dyn EventStore>,
}

impl Gateway {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    /// Handle one raw envelope request.
    ///
    /// Every failure — decode, validation or store — becomes a fault
    /// response; nothing escapes as an error.
    pub fn handle(&self, raw: &str) -> EnvelopeResponse {
        match self.dispatch(raw) {
            Ok(xml) => EnvelopeResponse {
                xml,
                server_error: false,
            },
            Err(err) => EnvelopeResponse {
                xml: encode_fault(&err.to_string()),
                server_error: err.is_server_error(),
            },
        }
    }

    fn dispatch(&self, raw: &str) -> EvschedResult<String> {
        match decode_request(raw)? {
            EnvelopeRequest::AddEvent(fields) => {
                let draft = fields.into_draft()?;
                let id = self.store.add(draft)?;
                Ok(encode_id_response(Operation::AddEvent, &id))
            }
            EnvelopeRequest::GetEvent(id) => {
                let event = match id {
                    Some(id) => self.store.get(&id)?,
                    None => None,
                };
                match event {
                    Some(event) => Ok(encode_event_response(Operation::GetEvent, &event)),
                    None => Err(EvschedError::NotFound),
                }
            }
            EnvelopeRequest::GetAllEvents => {
                let events = self.store.get_all()?;
                Ok(encode_events_response(Operation::GetAllEvents, &events))
            }
            EnvelopeRequest::UpdateEvent(fields) => {
                let id = fields.id.clone();
                // The payload is validated before the id check: an invalid
                // enum or format is a fault even when no id was supplied.
                let patch = fields.into_patch()?;
                let updated = match id {
                    Some(id) => self.store.update(&id, patch)?,
                    None => false,
                };
                Ok(encode_bool_response(Operation::UpdateEvent, updated))
            }
            EnvelopeRequest::DeleteEvent(id) => {
                let deleted = match id {
                    Some(id) => self.store.delete(&id)?,
                    None => false,
                };
                Ok(encode_bool_response(Operation::DeleteEvent, deleted))
            }
        }
    }
}
