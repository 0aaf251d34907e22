//! JSON CRUD endpoints for events.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::info;

use evsched_core::{Event, EventFields, EvschedError};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route(
            "/events/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/health", get(health))
}

const SUCCESS: &str = "success";

#[derive(Serialize)]
struct EventsResponse {
    events: Vec<Event>,
    status: &'static str,
}

#[derive(Serialize)]
struct EventResponse {
    event: Event,
    status: &'static str,
}

#[derive(Serialize)]
struct CreatedResponse {
    event_id: String,
    status: &'static str,
}

#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
}

/// GET /events
async fn list_events(State(state): State<AppState>) -> Result<Json<EventsResponse>, AppError> {
    let events = state.store.get_all()?;
    Ok(Json(EventsResponse {
        events,
        status: SUCCESS,
    }))
}

/// GET /events/{id}
async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EventResponse>, AppError> {
    match state.store.get(&id)? {
        Some(event) => Ok(Json(EventResponse {
            event,
            status: SUCCESS,
        })),
        None => Err(EvschedError::NotFound.into()),
    }
}

/// POST /events
async fn create_event(
    State(state): State<AppState>,
    Json(fields): Json<EventFields>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let draft = fields.into_draft()?;
    let event_id = state.store.add(draft)?;
    info!(%event_id, "event created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            event_id,
            status: SUCCESS,
        }),
    ))
}

/// PUT /events/{id}
async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(fields): Json<EventFields>,
) -> Result<Json<StatusResponse>, AppError> {
    let patch = fields.into_patch()?;
    if state.store.update(&id, patch)? {
        Ok(Json(StatusResponse { status: SUCCESS }))
    } else {
        Err(EvschedError::NotFound.into())
    }
}

/// DELETE /events/{id}
async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>, AppError> {
    if state.store.delete(&id)? {
        info!(%id, "event deleted");
        Ok(Json(StatusResponse { status: SUCCESS }))
    } else {
        Err(EvschedError::NotFound.into())
    }
}

/// GET /health - liveness probe.
async fn health() -> Json<StatusResponse> {
    Json(StatusResponse { status: "healthy" })
}
