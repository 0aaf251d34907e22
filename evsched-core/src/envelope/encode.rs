//! Envelope response and fault encoding.
//!
//! Responses are built as strings with text-node escaping; the envelope
//! always declares the soap, tns and sch namespace prefixes.

use super::{SCHEMA_NS, SOAP_NS, WSDL_NS};
use crate::event::Event;

/// The five gateway operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    AddEvent,
    GetEvent,
    GetAllEvents,
    UpdateEvent,
    DeleteEvent,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Self::AddEvent => "AddEvent",
            Self::GetEvent => "GetEvent",
            Self::GetAllEvents => "GetAllEvents",
            Self::UpdateEvent => "UpdateEvent",
            Self::DeleteEvent => "DeleteEvent",
        }
    }
}

fn envelope(body: String) -> String {
    format!(
        "<soap:Envelope xmlns:soap=\"{SOAP_NS}\" xmlns:tns=\"{WSDL_NS}\" \
         xmlns:sch=\"{SCHEMA_NS}\"><soap:Body>{body}</soap:Body></soap:Envelope>"
    )
}

fn response(op: Operation, inner: &str) -> String {
    let name = op.name();
    envelope(format!("<tns:{name}Response>{inner}</tns:{name}Response>"))
}

/// AddEvent: the assigned id as a plain return value.
pub fn encode_id_response(op: Operation, id: &str) -> String {
    response(op, &format!("<tns:return>{}</tns:return>", escape(id)))
}

/// UpdateEvent/DeleteEvent: the boolean outcome as `true`/`false` text.
pub fn encode_bool_response(op: Operation, success: bool) -> String {
    let text = if success { "true" } else { "false" };
    response(op, &format!("<tns:return>{text}</tns:return>"))
}

/// GetEvent: a single fully-qualified event element.
pub fn encode_event_response(op: Operation, event: &Event) -> String {
    response(op, &event_xml(event))
}

/// GetAllEvents: zero or more event elements; an empty store encodes as an
/// empty response element, not a fault.
pub fn encode_events_response(op: Operation, events: &[Event]) -> String {
    let inner: String = events.iter().map(event_xml).collect();
    response(op, &inner)
}

/// A fault replaces the operation response element entirely.
pub fn encode_fault(message: &str) -> String {
    envelope(format!(
        "<soap:Fault><faultcode>Server</faultcode><faultstring>{}</faultstring></soap:Fault>",
        escape(message)
    ))
}

/// One `<sch:event>` element.
///
/// None-valued fields are omitted rather than emitted as empty tags, and
/// the wire event carries no timestamps.
pub fn event_xml(event: &Event) -> String {
    let mut out = String::new();
    out.push_str("<sch:event>");
    field(&mut out, "id", &event.id);
    field(&mut out, "title", &event.title);
    if let Some(agenda) = &event.agenda {
        field(&mut out, "agenda", agenda);
    }
    field(&mut out, "date", &event.date.format("%Y-%m-%d").to_string());
    field(&mut out, "time", &event.time.format("%H:%M:%S").to_string());
    field(&mut out, "importance", event.importance.as_str());
    if let Some(location) = &event.location {
        field(&mut out, "location", location);
    }
    field(&mut out, "coordinator", &event.coordinator);
    field(&mut out, "recurrence", event.recurrence.as_str());
    if !event.participants.is_empty() {
        out.push_str("<sch:participants>");
        for name in &event.participants {
            field(&mut out, "participant", name);
        }
        out.push_str("</sch:participants>");
    }
    out.push_str("</sch:event>");
    out
}

fn field(out: &mut String, name: &str, value: &str) {
    out.push_str("<sch:");
    out.push_str(name);
    out.push('>');
    out.push_str(&escape(value));
    out.push_str("</sch:");
    out.push_str(name);
    out.push('>');
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Importance, Recurrence};
    use chrono::{NaiveDate, NaiveTime, Utc};

    fn sample_event() -> Event {
        Event {
            id: "e1".to_string(),
            title: "Budget <review> & planning".to_string(),
            agenda: None,
            date: NaiveDate::from_ymd_opt(2025, 10, 5).unwrap(),
            time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            importance: Importance::High,
            location: None,
            coordinator: "John Smith".to_string(),
            recurrence: Recurrence::None,
            participants: vec!["Alice".to_string()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn event_omits_none_fields_and_escapes_text() {
        let xml = event_xml(&sample_event());
        assert!(xml.contains("<sch:title>Budget &lt;review&gt; &amp; planning</sch:title>"));
        assert!(!xml.contains("<sch:agenda>"));
        assert!(!xml.contains("<sch:location>"));
        assert!(!xml.contains("created_at"));
        assert!(xml.contains("<sch:participants><sch:participant>Alice</sch:participant>"));
    }

    #[test]
    fn bool_response_is_plain_text() {
        let xml = encode_bool_response(Operation::DeleteEvent, false);
        assert!(xml.contains("<tns:DeleteEventResponse><tns:return>false</tns:return>"));
    }

    #[test]
    fn empty_sequence_encodes_as_empty_response_element() {
        let xml = encode_events_response(Operation::GetAllEvents, &[]);
        assert!(xml.contains("<tns:GetAllEventsResponse></tns:GetAllEventsResponse>"));
        assert!(!xml.contains("<sch:event>"));
    }

    #[test]
    fn fault_replaces_the_response_element() {
        let xml = encode_fault("Event not found");
        assert!(xml.contains("<soap:Fault>"));
        assert!(xml.contains("<faultcode>Server</faultcode>"));
        assert!(xml.contains("<faultstring>Event not found</faultstring>"));
        assert!(!xml.contains("Response>"));
    }
}
