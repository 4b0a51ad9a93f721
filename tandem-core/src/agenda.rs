//! The merged household agenda.
//!
//! Expands events and chores into one ordered list of occurrences for a date
//! range. The result is plain data handed straight to whoever asked; nothing
//! is cached anywhere on the way.

use crate::constants::{EVENT_OCCURRENCE_CAP, TASK_OCCURRENCE_CAP};
use crate::date_range::DateRange;
use crate::error::TandemResult;
use crate::event::Event;
use crate::recurrence::Occurrence;
use crate::task::Task;

/// Expand everything and merge into one agenda, sorted by date, then
/// time-of-day (all-day entries first), then title.
pub fn agenda(events: &[Event], tasks: &[Task], range: &DateRange) -> TandemResult<Vec<Occurrence>> {
    let mut occurrences = Vec::new();

    for event in events {
        occurrences.extend(
            event
                .occurrences(EVENT_OCCURRENCE_CAP)?
                .into_iter()
                .filter(|o| range.contains(o.date)),
        );
    }

    for task in tasks {
        occurrences.extend(
            task.occurrences(TASK_OCCURRENCE_CAP)?
                .into_iter()
                .filter(|o| range.contains(o.date)),
        );
    }

    occurrences.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.time_of_day.cmp(&b.time_of_day))
            .then_with(|| a.title.cmp(&b.title))
    });

    Ok(occurrences)
}
