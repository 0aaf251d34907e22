//! The SOAP envelope endpoint.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use tracing::warn;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/soap", post(soap_endpoint))
}

/// POST /soap - raw envelope in, raw envelope out.
///
/// The gateway turns every failure into a fault document; here we only pick
/// the status code. Not-found and unknown-operation faults go out as 200.
async fn soap_endpoint(State(state): State<AppState>, body: String) -> Response {
    let reply = state.gateway.handle(&body);
    let status = if reply.server_error {
        warn!("envelope request failed");
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    };
    (status, [(header::CONTENT_TYPE, "text/xml")], reply.xml).into_response()
}
