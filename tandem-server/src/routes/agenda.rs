//! Merged agenda endpoint

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use tandem_core::agenda::agenda;
use tandem_core::date_range::DateRange;
use tandem_core::recurrence::Occurrence;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/agenda", get(get_agenda))
}

#[derive(Deserialize)]
pub struct AgendaQuery {
    /// YYYY-MM-DD, or "start" for unbounded past
    pub from: Option<String>,
    /// YYYY-MM-DD
    pub to: Option<String>,
}

/// GET /agenda - Expanded occurrences of all events and chores in range
async fn get_agenda(
    State(state): State<AppState>,
    Query(query): Query<AgendaQuery>,
) -> Result<Json<Vec<Occurrence>>, AppError> {
    let household = state.household()?;

    let range = DateRange::from_args(query.from.as_deref(), query.to.as_deref())
        .map_err(|e| anyhow::anyhow!(e))?;

    let events = household.events()?;
    let tasks = household.tasks()?;

    Ok(Json(agenda(&events, &tasks, &range)?))
}
