//! Envelope request decoding.

use roxmltree::{Document, Node};

use super::{SCHEMA_NS, SOAP_NS};
use crate::error::{EvschedError, EvschedResult};
use crate::fields::EventFields;

/// A decoded envelope request: operation plus payload.
///
/// GetEvent/DeleteEvent carry the id as found on the wire; a missing
/// `eventId` element is not a decode error (GetEvent then resolves to a
/// not-found fault, DeleteEvent to a false outcome).
#[derive(Debug, Clone)]
pub enum EnvelopeRequest {
    AddEvent(EventFields),
    GetEvent(Option<String>),
    GetAllEvents,
    UpdateEvent(EventFields),
    DeleteEvent(Option<String>),
}

/// Decode raw envelope XML into an operation.
///
/// Body children are scanned in order and unrecognized elements skipped
/// until an operation name matches; a Body with no recognized operation is
/// `UnknownOperation`. Field values are extracted as raw strings — format
/// and enum errors surface later, in validation.
pub fn decode_request(xml: &str) -> EvschedResult<EnvelopeRequest> {
    let doc =
        Document::parse(xml).map_err(|err| EvschedError::MalformedEnvelope(err.to_string()))?;
    let body = doc
        .descendants()
        .find(|node| node.has_tag_name((SOAP_NS, "Body")))
        .ok_or_else(|| EvschedError::MalformedEnvelope("Body element not found".to_string()))?;

    for child in body.children().filter(|node| node.is_element()) {
        let request = match child.tag_name().name() {
            "AddEvent" => EnvelopeRequest::AddEvent(event_fields(child)),
            "GetEvent" => EnvelopeRequest::GetEvent(event_id(child)),
            "GetAllEvents" => EnvelopeRequest::GetAllEvents,
            "UpdateEvent" => EnvelopeRequest::UpdateEvent(event_fields(child)),
            "DeleteEvent" => EnvelopeRequest::DeleteEvent(event_id(child)),
            _ => continue,
        };
        return Ok(request);
    }

    Err(EvschedError::UnknownOperation)
}

fn find_field<'a, 'input>(scope: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    scope
        .descendants()
        .find(|node| node.has_tag_name((SCHEMA_NS, name)))
}

fn event_id(op: Node) -> Option<String> {
    find_field(op, "eventId")
        .and_then(|node| node.text())
        .map(str::to_string)
}

/// Pull raw field strings out of the operation element.
///
/// Fields live under a nested `eventData` (or `event`) element when one is
/// present, otherwise directly under the operation element. An empty element
/// for `agenda`/`location` decodes as an explicit clear.
fn event_fields(op: Node) -> EventFields {
    let scope = find_field(op, "eventData")
        .or_else(|| find_field(op, "event"))
        .unwrap_or(op);

    let text = |name: &str| {
        find_field(scope, name)
            .and_then(|node| node.text())
            .map(str::to_string)
    };
    let clearable = |name: &str| find_field(scope, name).map(|node| node.text().map(str::to_string));

    let participants = find_field(scope, "participants").map(|parent| {
        parent
            .descendants()
            .filter(|node| node.has_tag_name((SCHEMA_NS, "participant")))
            .filter_map(|node| node.text())
            .map(str::to_string)
            .collect()
    });

    EventFields {
        id: text("id"),
        title: text("title"),
        agenda: clearable("agenda"),
        date: text("date"),
        time: text("time"),
        importance: text("importance"),
        location: clearable("location"),
        coordinator: text("coordinator"),
        recurrence: text("recurrence"),
        participants,
    }
}
