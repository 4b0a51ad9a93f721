//! Chore board endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;

use tandem_core::event::Recurrence;
use tandem_core::scope::{delete_task_instance, EditScope, ScopedDelete};
use tandem_core::task::Task;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/{id}/status", post(change_status))
        .route("/tasks/{id}", delete(delete_task))
}

/// GET /tasks - List all chores
async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>, AppError> {
    let household = state.household()?;
    Ok(Json(household.tasks()?))
}

/// Request body for creating a chore
#[derive(Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub points: u32,
    pub date: NaiveDate,
    pub time_of_day: Option<String>,
    pub description: Option<String>,
    pub recurrence: Option<Recurrence>,
}

/// POST /tasks - Add a chore to the board
async fn create_task(
    State(state): State<AppState>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<Json<Task>, AppError> {
    let household = state.household()?;

    let mut task = Task::new(req.title, req.points, req.date);
    task.time_of_day = req.time_of_day;
    task.description = req.description;
    task.recurrence = req.recurrence;

    household.create_task(&task)?;

    Ok(Json(task))
}

/// Lifecycle actions a partner can press
#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusAction {
    Claim,
    Complete,
    Approve,
    Reject,
}

/// Request body for a status change
#[derive(Deserialize)]
pub struct StatusChangeRequest {
    pub action: StatusAction,
    /// Required for "claim"
    pub partner: Option<String>,
}

/// POST /tasks/:id/status - Drive the chore lifecycle
async fn change_status(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    Json(req): Json<StatusChangeRequest>,
) -> Result<Json<Task>, AppError> {
    let household = state.household()?;
    let mut task = household.find_task(&task_id)?;

    match req.action {
        StatusAction::Claim => {
            let partner = req
                .partner
                .ok_or_else(|| anyhow::anyhow!("'claim' requires a partner"))?;
            task.claim(&partner)?;
        }
        StatusAction::Complete => task.complete()?,
        StatusAction::Approve => task.approve()?,
        StatusAction::Reject => task.reject()?,
    }

    household.update_task(&task.id, &task)?;

    Ok(Json(task))
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

/// DELETE /tasks/:id - Remove a chore (or one/future occurrences of it)
async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    Query(params): Query<DeleteParams>,
) -> Result<StatusCode, AppError> {
    let household = state.household()?;
    let mut task = household.find_task(&task_id)?;

    let date = match (params.scope, params.date) {
        (EditScope::All, date) => date.unwrap_or(task.date),
        (_, Some(date)) => date,
        (scope, None) => {
            return Err(anyhow::anyhow!("'{:?}' scope requires a date", scope).into());
        }
    };

    match delete_task_instance(&mut task, date, params.scope)? {
        ScopedDelete::UpdateSeries => household.update_task(&task.id, &task)?,
        ScopedDelete::RemoveSeries => household.delete_task(&task.id)?,
    }

    Ok(StatusCode::NO_CONTENT)
}
