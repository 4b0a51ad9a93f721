//! Scoped edits and deletions on recurring series.
//!
//! "Only this" records a per-date override. "This and future" truncates the
//! series just before the target date, spawning a fresh series for the
//! remainder when the edit needs one. "All" changes the series record itself.
//! The caller persists whatever these return; nothing here touches storage.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{TandemError, TandemResult};
use crate::event::{Event, Recurrence};
use crate::recurrence::InstancePatch;
use crate::task::Task;

/// Which occurrences an edit or deletion applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditScope {
    OnlyThis,
    ThisAndFuture,
    All,
}

/// What the caller must do with the series record afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopedDelete {
    /// The series changed in place; save it.
    UpdateSeries,
    /// The whole series is gone; remove it.
    RemoveSeries,
}

/// Delete an event occurrence under the given scope.
pub fn delete_event_instance(
    event: &mut Event,
    date: NaiveDate,
    scope: EditScope,
) -> TandemResult<ScopedDelete> {
    if event.recurrence.is_none() || scope == EditScope::All {
        return Ok(ScopedDelete::RemoveSeries);
    }

    if scope == EditScope::OnlyThis {
        event.overrides.exclude(date);
        return Ok(ScopedDelete::UpdateSeries);
    }

    // ThisAndFuture: cutting at or before the anchor leaves nothing behind.
    if date <= event.date {
        return Ok(ScopedDelete::RemoveSeries);
    }
    if let Some(recurrence) = event.recurrence.as_mut() {
        truncate_before(recurrence, date)?;
    }
    drop_overrides_from(&mut event.overrides, date);
    Ok(ScopedDelete::UpdateSeries)
}

/// Delete a task occurrence under the given scope.
pub fn delete_task_instance(
    task: &mut Task,
    date: NaiveDate,
    scope: EditScope,
) -> TandemResult<ScopedDelete> {
    if task.recurrence.is_none() || scope == EditScope::All {
        return Ok(ScopedDelete::RemoveSeries);
    }

    if scope == EditScope::OnlyThis {
        task.overrides.exclude(date);
        return Ok(ScopedDelete::UpdateSeries);
    }

    if date <= task.date {
        return Ok(ScopedDelete::RemoveSeries);
    }
    if let Some(recurrence) = task.recurrence.as_mut() {
        truncate_before(recurrence, date)?;
    }
    drop_overrides_from(&mut task.overrides, date);
    Ok(ScopedDelete::UpdateSeries)
}

/// Edit an event occurrence under the given scope.
///
/// Returns the new remainder series for `ThisAndFuture`, which the caller
/// must create alongside saving the truncated original.
pub fn edit_event_instance(
    event: &mut Event,
    date: NaiveDate,
    patch: InstancePatch,
    scope: EditScope,
) -> TandemResult<Option<Event>> {
    match scope {
        EditScope::OnlyThis => {
            event.overrides.patch(date, patch);
            Ok(None)
        }
        EditScope::All => {
            apply_patch_to_event(event, patch);
            Ok(None)
        }
        EditScope::ThisAndFuture => {
            if event.recurrence.is_none() || date <= event.date {
                // Nothing before the target survives; this is an "all" edit.
                apply_patch_to_event(event, patch);
                return Ok(None);
            }

            let mut remainder = event.clone();
            remainder.id = Uuid::new_v4().to_string();
            remainder.date = date;
            apply_patch_to_event(&mut remainder, patch);

            // Overrides stay with the half of the series they fall in.
            remainder.overrides.excluded_dates = remainder
                .overrides
                .excluded_dates
                .split_off(&date);
            remainder.overrides.modified_instances =
                remainder.overrides.modified_instances.split_off(&date);

            if let Some(recurrence) = event.recurrence.as_mut() {
                truncate_before(recurrence, date)?;
            }
            drop_overrides_from(&mut event.overrides, date);

            Ok(Some(remainder))
        }
    }
}

fn apply_patch_to_event(event: &mut Event, patch: InstancePatch) {
    if let Some(title) = patch.title {
        event.title = title;
    }
    if let Some(time) = patch.time_of_day {
        event.time_of_day = Some(time);
    }
}

/// Cap a series' end date to the day before `date`.
fn truncate_before(recurrence: &mut Recurrence, date: NaiveDate) -> TandemResult<()> {
    let new_until = date
        .checked_sub_days(Days::new(1))
        .ok_or_else(|| TandemError::Validation(format!("Date arithmetic out of range before {}", date)))?;

    recurrence.until = Some(match recurrence.until {
        Some(existing) if existing < new_until => existing,
        _ => new_until,
    });

    Ok(())
}

/// Remove overrides on or after `date`; they belong to occurrences the
/// truncated series no longer produces.
fn drop_overrides_from(overrides: &mut crate::recurrence::OverrideSet, date: NaiveDate) {
    overrides.excluded_dates = std::mem::take(&mut overrides.excluded_dates)
        .into_iter()
        .filter(|d| *d < date)
        .collect();
    overrides.modified_instances = std::mem::take(&mut overrides.modified_instances)
        .into_iter()
        .filter(|(d, _)| *d < date)
        .collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recurrence::Frequency;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn weekly_event() -> Event {
        let mut event = Event::new("Date night".to_string(), date("2024-03-01"));
        event.time_of_day = Some("18:00".to_string());
        event.recurrence = Some(Recurrence {
            frequency: Frequency::Weekly,
            until: Some(date("2024-03-29")),
            weekdays: Vec::new(),
        });
        event
    }

    #[test]
    fn only_this_delete_records_an_exclusion() {
        let mut event = weekly_event();

        let outcome = delete_event_instance(&mut event, date("2024-03-15"), EditScope::OnlyThis).unwrap();

        assert_eq!(outcome, ScopedDelete::UpdateSeries);
        assert!(event.overrides.excluded_dates.contains(&date("2024-03-15")));
        // The rule itself is untouched.
        assert_eq!(event.recurrence.as_ref().unwrap().until, Some(date("2024-03-29")));
    }

    #[test]
    fn this_and_future_delete_truncates_the_series() {
        let mut event = weekly_event();
        event.overrides.exclude(date("2024-03-08"));
        event.overrides.exclude(date("2024-03-22"));

        let outcome = delete_event_instance(&mut event, date("2024-03-15"), EditScope::ThisAndFuture).unwrap();

        assert_eq!(outcome, ScopedDelete::UpdateSeries);
        assert_eq!(event.recurrence.as_ref().unwrap().until, Some(date("2024-03-14")));
        // The override past the cut is gone, the earlier one stays.
        assert!(event.overrides.excluded_dates.contains(&date("2024-03-08")));
        assert!(!event.overrides.excluded_dates.contains(&date("2024-03-22")));
    }

    #[test]
    fn this_and_future_delete_at_the_anchor_removes_everything() {
        let mut event = weekly_event();

        let outcome = delete_event_instance(&mut event, date("2024-03-01"), EditScope::ThisAndFuture).unwrap();

        assert_eq!(outcome, ScopedDelete::RemoveSeries);
    }

    #[test]
    fn delete_all_removes_the_series() {
        let mut event = weekly_event();
        let outcome = delete_event_instance(&mut event, date("2024-03-15"), EditScope::All).unwrap();
        assert_eq!(outcome, ScopedDelete::RemoveSeries);
    }

    #[test]
    fn one_off_delete_always_removes() {
        let mut event = Event::new("Vet".to_string(), date("2024-05-02"));
        let outcome = delete_event_instance(&mut event, date("2024-05-02"), EditScope::OnlyThis).unwrap();
        assert_eq!(outcome, ScopedDelete::RemoveSeries);
    }

    #[test]
    fn only_this_edit_patches_one_instance() {
        let mut event = weekly_event();

        let created = edit_event_instance(
            &mut event,
            date("2024-03-08"),
            InstancePatch {
                title: Some("Anniversary".to_string()),
                time_of_day: None,
            },
            EditScope::OnlyThis,
        )
        .unwrap();

        assert!(created.is_none());
        assert_eq!(event.title, "Date night");
        let patch = &event.overrides.modified_instances[&date("2024-03-08")];
        assert_eq!(patch.title.as_deref(), Some("Anniversary"));
    }

    #[test]
    fn edit_all_rewrites_the_series_record() {
        let mut event = weekly_event();

        edit_event_instance(
            &mut event,
            date("2024-03-08"),
            InstancePatch {
                title: Some("Movie night".to_string()),
                time_of_day: Some("20:00".to_string()),
            },
            EditScope::All,
        )
        .unwrap();

        assert_eq!(event.title, "Movie night");
        assert_eq!(event.time_of_day.as_deref(), Some("20:00"));
        assert!(event.overrides.modified_instances.is_empty());
    }

    #[test]
    fn this_and_future_edit_splits_the_series() {
        let mut event = weekly_event();
        event.overrides.exclude(date("2024-03-08"));
        event.overrides.exclude(date("2024-03-22"));

        let remainder = edit_event_instance(
            &mut event,
            date("2024-03-15"),
            InstancePatch {
                title: Some("Game night".to_string()),
                time_of_day: None,
            },
            EditScope::ThisAndFuture,
        )
        .unwrap()
        .expect("should create a remainder series");

        // Original: truncated, keeps only the early exclusion.
        assert_eq!(event.recurrence.as_ref().unwrap().until, Some(date("2024-03-14")));
        assert_eq!(event.title, "Date night");
        assert!(event.overrides.excluded_dates.contains(&date("2024-03-08")));
        assert!(!event.overrides.excluded_dates.contains(&date("2024-03-22")));

        // Remainder: fresh id, starts at the cut, carries the edit and the
        // late exclusion, keeps the original end date.
        assert_ne!(remainder.id, event.id);
        assert_eq!(remainder.date, date("2024-03-15"));
        assert_eq!(remainder.title, "Game night");
        assert_eq!(remainder.recurrence.as_ref().unwrap().until, Some(date("2024-03-29")));
        assert!(remainder.overrides.excluded_dates.contains(&date("2024-03-22")));
        assert!(!remainder.overrides.excluded_dates.contains(&date("2024-03-08")));
    }

    #[test]
    fn task_skip_records_an_exclusion() {
        let mut task = Task::new("Dishes".to_string(), 5, date("2024-03-04"));
        task.recurrence = Some(Recurrence {
            frequency: Frequency::Daily,
            until: None,
            weekdays: Vec::new(),
        });

        let outcome = delete_task_instance(&mut task, date("2024-03-06"), EditScope::OnlyThis).unwrap();

        assert_eq!(outcome, ScopedDelete::UpdateSeries);
        assert!(task.overrides.excluded_dates.contains(&date("2024-03-06")));
    }
}
