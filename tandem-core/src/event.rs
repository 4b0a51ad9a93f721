//! Shared calendar events.
//!
//! An event is either a one-off on a single date or a recurring series. Both
//! kinds expand to [`Occurrence`]s through the same expander, so per-instance
//! overrides (skip this one, rename that one) work identically for both.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::EVENT_OCCURRENCE_CAP;
use crate::error::TandemResult;
use crate::recurrence::{
    expand, Frequency, Occurrence, OccurrenceKind, OccurrenceTemplate, OverrideSet, RecurrenceRule,
};

/// How a stored event repeats. Anchor date and time-of-day live on the event
/// itself; this only describes the advancement and the stop condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recurrence {
    pub frequency: Frequency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub until: Option<NaiveDate>,
    /// Weekday indices, 0=Sunday..6=Saturday. Non-empty switches the series
    /// to weekday-set advancement.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weekdays: Vec<u8>,
}

/// A calendar event shared by the household.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The event's date, or the series anchor when recurring.
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<String>,
    /// Partner names attending; empty means both by convention.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub participants: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
    #[serde(default, skip_serializing_if = "OverrideSet::is_empty")]
    pub overrides: OverrideSet,
}

impl Event {
    pub fn new(title: String, date: NaiveDate) -> Self {
        Event {
            id: Uuid::new_v4().to_string(),
            title,
            description: None,
            date,
            time_of_day: None,
            participants: Vec::new(),
            color: None,
            recurrence: None,
            overrides: OverrideSet::default(),
        }
    }

    /// The expander input for this event. One-offs become a degenerate
    /// single-day rule so exclusions and patches flow through the same path.
    pub fn rule(&self) -> RecurrenceRule {
        match &self.recurrence {
            Some(recurrence) => RecurrenceRule {
                anchor_date: self.date,
                frequency: recurrence.frequency,
                end_date: recurrence.until,
                time_of_day: self.time_of_day.clone(),
                weekdays: recurrence.weekdays.clone(),
            },
            None => RecurrenceRule {
                anchor_date: self.date,
                frequency: Frequency::Daily,
                end_date: Some(self.date),
                time_of_day: self.time_of_day.clone(),
                weekdays: Vec::new(),
            },
        }
    }

    fn template(&self) -> OccurrenceTemplate {
        OccurrenceTemplate {
            series_id: self.id.clone(),
            title: self.title.clone(),
            kind: OccurrenceKind::Event,
            participants: self.participants.clone(),
            color: self.color.clone(),
            frequency: self.recurrence.as_ref().map(|r| r.frequency),
        }
    }

    /// Expand this event into concrete occurrences, capped at `max`.
    pub fn occurrences(&self, max: usize) -> TandemResult<Vec<Occurrence>> {
        expand(&self.rule(), &self.overrides, &self.template(), max)
    }

    /// Expand with the standard event cap.
    pub fn default_occurrences(&self) -> TandemResult<Vec<Occurrence>> {
        self.occurrences(EVENT_OCCURRENCE_CAP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn one_off_event_expands_to_single_occurrence() {
        let mut event = Event::new("Vet appointment".to_string(), date("2024-05-02"));
        event.time_of_day = Some("09:30".to_string());

        let occurrences = event.default_occurrences().unwrap();

        assert_eq!(occurrences.len(), 1);
        assert_eq!(occurrences[0].date, date("2024-05-02"));
        assert_eq!(occurrences[0].time_of_day.as_deref(), Some("09:30"));
        assert_eq!(occurrences[0].kind, OccurrenceKind::Event);
        assert_eq!(occurrences[0].frequency, None);
    }

    #[test]
    fn cancelled_one_off_expands_to_nothing() {
        let mut event = Event::new("Vet appointment".to_string(), date("2024-05-02"));
        event.overrides.exclude(date("2024-05-02"));

        assert!(event.default_occurrences().unwrap().is_empty());
    }

    #[test]
    fn recurring_event_carries_frequency_metadata() {
        let mut event = Event::new("Laundry day".to_string(), date("2024-03-04"));
        event.recurrence = Some(Recurrence {
            frequency: Frequency::Weekly,
            until: Some(date("2024-03-25")),
            weekdays: Vec::new(),
        });

        let occurrences = event.default_occurrences().unwrap();

        assert_eq!(occurrences.len(), 4);
        assert!(occurrences.iter().all(|o| o.frequency == Some(Frequency::Weekly)));
        assert!(occurrences.iter().all(|o| o.series_id == event.id));
    }

    #[test]
    fn expansion_does_not_mutate_the_event() {
        let mut event = Event::new("Laundry day".to_string(), date("2024-03-04"));
        event.recurrence = Some(Recurrence {
            frequency: Frequency::Daily,
            until: None,
            weekdays: Vec::new(),
        });
        event.overrides.exclude(date("2024-03-05"));
        let before = event.clone();

        event.default_occurrences().unwrap();

        assert_eq!(event, before);
    }
}
