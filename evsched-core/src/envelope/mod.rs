//! SOAP envelope codec: decode requests, encode responses and faults.

mod decode;
mod encode;

pub use decode::{decode_request, EnvelopeRequest};
pub use encode::{
    encode_bool_response, encode_event_response, encode_events_response, encode_fault,
    encode_id_response, event_xml, Operation,
};

pub(crate) const SOAP_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
pub(crate) const WSDL_NS: &str = "http://eventscheduling.com/wsdl";
pub(crate) const SCHEMA_NS: &str = "http://eventscheduling.com/schemas";
