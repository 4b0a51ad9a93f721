//! Overdue and time-window checks.
//!
//! All comparisons happen in UTC against an explicit `now` supplied by the
//! caller; converting for display is the renderer's problem. An occurrence
//! with a time-of-day is overdue once that UTC instant passes; without one,
//! at the end of its UTC day.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::recurrence::Occurrence;

/// Where an occurrence stands relative to `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueState {
    /// Its day hasn't started yet.
    Upcoming,
    /// Inside its day, deadline not yet passed.
    Open,
    /// Deadline passed.
    Overdue,
}

/// Classify a dated occurrence against `now`.
///
/// An unparseable `time_of_day` falls back to end-of-day, same as having
/// none; the field is an opaque pass-through everywhere else and a bad value
/// shouldn't make an item unexpectedly overdue at midnight.
pub fn due_state(date: NaiveDate, time_of_day: Option<&str>, now: DateTime<Utc>) -> DueState {
    let day_start = date.and_time(NaiveTime::MIN).and_utc();

    let deadline_time = time_of_day
        .and_then(|t| NaiveTime::parse_from_str(t, "%H:%M").ok())
        .unwrap_or_else(end_of_day);
    let deadline = date.and_time(deadline_time).and_utc();

    if now < day_start {
        DueState::Upcoming
    } else if now <= deadline {
        DueState::Open
    } else {
        DueState::Overdue
    }
}

impl Occurrence {
    pub fn due_state(&self, now: DateTime<Utc>) -> DueState {
        due_state(self.date, self.time_of_day.as_deref(), now)
    }
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn timed_occurrence_boundaries() {
        let d = date("2024-03-08");

        assert_eq!(
            due_state(d, Some("18:00"), at("2024-03-07T23:00:00Z")),
            DueState::Upcoming
        );
        assert_eq!(
            due_state(d, Some("18:00"), at("2024-03-08T17:59:00Z")),
            DueState::Open
        );
        // The deadline instant itself is still open.
        assert_eq!(
            due_state(d, Some("18:00"), at("2024-03-08T18:00:00Z")),
            DueState::Open
        );
        assert_eq!(
            due_state(d, Some("18:00"), at("2024-03-08T18:00:01Z")),
            DueState::Overdue
        );
    }

    #[test]
    fn all_day_occurrence_is_open_until_midnight() {
        let d = date("2024-03-08");

        assert_eq!(due_state(d, None, at("2024-03-08T00:00:00Z")), DueState::Open);
        assert_eq!(due_state(d, None, at("2024-03-08T23:59:59Z")), DueState::Open);
        assert_eq!(due_state(d, None, at("2024-03-09T00:00:00Z")), DueState::Overdue);
    }

    #[test]
    fn garbage_time_of_day_behaves_like_all_day() {
        let d = date("2024-03-08");

        assert_eq!(
            due_state(d, Some("six-ish"), at("2024-03-08T20:00:00Z")),
            DueState::Open
        );
        assert_eq!(
            due_state(d, Some("six-ish"), at("2024-03-09T01:00:00Z")),
            DueState::Overdue
        );
    }
}
