//! Calendar event endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use tandem_core::event::{Event, Recurrence};
use tandem_core::recurrence::InstancePatch;
use tandem_core::scope::{delete_event_instance, edit_event_instance, EditScope, ScopedDelete};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/{id}", patch(edit_event).delete(delete_event))
}

/// GET /events - List all event series
async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, AppError> {
    let household = state.household()?;
    Ok(Json(household.events()?))
}

/// Request body for creating an event
#[derive(Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub date: NaiveDate,
    pub time_of_day: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub participants: Vec<String>,
    pub color: Option<String>,
    pub recurrence: Option<Recurrence>,
}

/// POST /events - Create a new event
async fn create_event(
    State(state): State<AppState>,
    Json(req): Json<CreateEventRequest>,
) -> Result<Json<Event>, AppError> {
    let household = state.household()?;

    let mut event = Event::new(req.title, req.date);
    event.time_of_day = req.time_of_day;
    event.description = req.description;
    event.participants = req.participants;
    event.color = req.color;
    event.recurrence = req.recurrence;

    household.create_event(&event)?;

    Ok(Json(event))
}

/// Request body for a scoped edit
#[derive(Deserialize)]
pub struct EditEventRequest {
    pub scope: EditScope,
    /// Target occurrence; required unless scope is "all"
    pub date: Option<NaiveDate>,
    pub title: Option<String>,
    pub time_of_day: Option<String>,
}

/// An edit may split the series in two
#[derive(Serialize)]
pub struct EditEventResponse {
    pub event: Event,
    /// New remainder series created by a "this-and-future" edit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<Event>,
}

/// PATCH /events/:id - Edit an event under a scope
async fn edit_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Json(req): Json<EditEventRequest>,
) -> Result<Json<EditEventResponse>, AppError> {
    let household = state.household()?;
    let mut event = household.find_event(&event_id)?;

    let date = target_date(req.scope, req.date, event.date)?;
    let patch = InstancePatch {
        title: req.title,
        time_of_day: req.time_of_day,
    };

    let created = edit_event_instance(&mut event, date, patch, req.scope)?;

    household.update_event(&event.id, &event)?;
    if let Some(new_series) = &created {
        household.create_event(new_series)?;
    }

    Ok(Json(EditEventResponse { event, created }))
}

/// Query params for a scoped delete
#[derive(Deserialize)]
pub struct DeleteParams {
    #[serde(default = "default_scope")]
    pub scope: EditScope,
    pub date: Option<NaiveDate>,
}

fn default_scope() -> EditScope {
    EditScope::All
}

/// DELETE /events/:id - Delete an event (or one/future occurrences of it)
async fn delete_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Query(params): Query<DeleteParams>,
) -> Result<StatusCode, AppError> {
    let household = state.household()?;
    let mut event = household.find_event(&event_id)?;

    let date = target_date(params.scope, params.date, event.date)?;

    match delete_event_instance(&mut event, date, params.scope)? {
        ScopedDelete::UpdateSeries => household.update_event(&event.id, &event)?,
        ScopedDelete::RemoveSeries => household.delete_event(&event.id)?,
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Instance scopes need a target date; "all" doesn't.
fn target_date(
    scope: EditScope,
    date: Option<NaiveDate>,
    fallback: NaiveDate,
) -> Result<NaiveDate, AppError> {
    match (scope, date) {
        (EditScope::All, _) => Ok(date.unwrap_or(fallback)),
        (_, Some(date)) => Ok(date),
        (_, None) => Err(anyhow::anyhow!("'{:?}' scope requires a date", scope).into()),
    }
}
