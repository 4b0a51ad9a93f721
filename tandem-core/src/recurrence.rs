//! Recurrence expansion for repeating events and chores.
//!
//! Expands a recurrence rule into concrete dated occurrences within the rule's
//! window, respecting per-date exclusions and instance patches without ever
//! mutating the rule itself.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{TandemError, TandemResult};

/// How often a rule repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Frequency {
    type Err = TandemError;

    /// Unknown frequency values are rejected, never defaulted.
    fn from_str(s: &str) -> TandemResult<Self> {
        match s {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "biweekly" => Ok(Frequency::Biweekly),
            "monthly" => Ok(Frequency::Monthly),
            "yearly" => Ok(Frequency::Yearly),
            other => Err(TandemError::Validation(format!(
                "Unknown frequency '{}'. Expected daily, weekly, biweekly, monthly or yearly",
                other
            ))),
        }
    }
}

/// The full input to [`expand`]: when the series starts, how it advances,
/// and when it stops.
///
/// `weekdays` holds weekday indices (0=Sunday..6=Saturday). A non-empty set
/// switches advancement to "every day in range whose weekday is listed",
/// overriding `frequency` stepping entirely; the frequency then only survives
/// as display metadata on the occurrences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub anchor_date: NaiveDate,
    pub frequency: Frequency,
    pub end_date: Option<NaiveDate>,
    /// Opaque "HH:MM" pass-through; carried onto occurrences unchanged.
    pub time_of_day: Option<String>,
    #[serde(default)]
    pub weekdays: Vec<u8>,
}

/// Per-occurrence exceptions layered on top of a rule, keyed by occurrence
/// date. Recording an exception here is the only durable trace an edited or
/// cancelled instance leaves; the rule itself stays untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverrideSet {
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub excluded_dates: BTreeSet<NaiveDate>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub modified_instances: BTreeMap<NaiveDate, InstancePatch>,
}

impl OverrideSet {
    pub fn is_empty(&self) -> bool {
        self.excluded_dates.is_empty() && self.modified_instances.is_empty()
    }

    /// Suppress the occurrence on `date`.
    pub fn exclude(&mut self, date: NaiveDate) {
        self.excluded_dates.insert(date);
        self.modified_instances.remove(&date);
    }

    /// Patch the occurrence on `date`, merging with any earlier patch.
    pub fn patch(&mut self, date: NaiveDate, patch: InstancePatch) {
        let entry = self.modified_instances.entry(date).or_default();
        if patch.title.is_some() {
            entry.title = patch.title;
        }
        if patch.time_of_day.is_some() {
            entry.time_of_day = patch.time_of_day;
        }
    }
}

/// A partial replacement applied to a single occurrence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstancePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<String>,
}

/// Whether an occurrence came from a calendar event or a chore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OccurrenceKind {
    Event,
    Task,
}

/// The invariant fields a series attaches to every occurrence it produces.
///
/// Both call sites (events and task-derived entries) go through the same
/// [`expand`]; their differences (cap, title decoration, kind) live here and
/// in the caller-supplied cap rather than in duplicated expansion loops.
#[derive(Debug, Clone, PartialEq)]
pub struct OccurrenceTemplate {
    pub series_id: String,
    pub title: String,
    pub kind: OccurrenceKind,
    pub participants: Vec<String>,
    pub color: Option<String>,
    /// Recurrence metadata surfaced to the renderer; `None` for one-offs.
    pub frequency: Option<Frequency>,
}

/// One concrete, dated instance of a series. Ephemeral: recomputed on every
/// read, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occurrence {
    /// Deterministic: the same series and date always yield the same id.
    pub id: String,
    pub series_id: String,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<String>,
    pub title: String,
    pub kind: OccurrenceKind,
    pub participants: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
}

/// Instance id for a series occurrence on a given date.
pub fn occurrence_id(series_id: &str, date: NaiveDate) -> String {
    format!("{}__{}", series_id, date.format("%Y-%m-%d"))
}

/// Expand a recurrence rule into its ordered occurrences.
///
/// - With `end_date` absent, a working end bound of anchor + 1 year keeps the
///   iteration finite; `max_occurrences` is the hard cap on candidates
///   considered either way, so open-ended rules always terminate.
/// - An occurrence falling exactly on `end_date` is included.
/// - `end_date` earlier than `anchor_date` yields an empty sequence, not an
///   error.
/// - Excluded dates are dropped; patched dates are emitted with the patch
///   applied to that occurrence only.
///
/// Pure function of its inputs: neither `rule` nor `overrides` is mutated,
/// and identical inputs always produce identical output.
pub fn expand(
    rule: &RecurrenceRule,
    overrides: &OverrideSet,
    template: &OccurrenceTemplate,
    max_occurrences: usize,
) -> TandemResult<Vec<Occurrence>> {
    if let Some(bad) = rule.weekdays.iter().find(|&&d| d > 6) {
        return Err(TandemError::Validation(format!(
            "Invalid weekday index {} (expected 0=Sunday..6=Saturday)",
            bad
        )));
    }

    if let Some(end) = rule.end_date {
        if end < rule.anchor_date {
            return Ok(Vec::new());
        }
    }

    let horizon = match rule.end_date {
        Some(end) => end,
        None => rule
            .anchor_date
            .checked_add_months(Months::new(12))
            .ok_or_else(|| date_out_of_range(rule.anchor_date))?,
    };

    let mut occurrences = Vec::new();
    let mut candidates = 0usize;

    if rule.weekdays.is_empty() {
        // Frequency-step policy: emit at the cursor, then advance one unit.
        let mut cursor = rule.anchor_date;
        while cursor <= horizon && candidates < max_occurrences {
            candidates += 1;
            emit(cursor, rule, overrides, template, &mut occurrences);
            cursor = advance(cursor, rule.frequency)?;
        }
    } else {
        // Weekday-set policy: walk every day in range, emitting on matches.
        // Steps daily regardless of the frequency value.
        let mut cursor = rule.anchor_date;
        while cursor <= horizon && candidates < max_occurrences {
            if rule.weekdays.contains(&weekday_index(cursor)) {
                candidates += 1;
                emit(cursor, rule, overrides, template, &mut occurrences);
            }
            cursor = cursor
                .checked_add_days(Days::new(1))
                .ok_or_else(|| date_out_of_range(cursor))?;
        }
    }

    Ok(occurrences)
}

/// Weekday index of a date, 0=Sunday..6=Saturday.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Build the occurrence for one candidate date, applying overrides.
fn emit(
    date: NaiveDate,
    rule: &RecurrenceRule,
    overrides: &OverrideSet,
    template: &OccurrenceTemplate,
    out: &mut Vec<Occurrence>,
) {
    if overrides.excluded_dates.contains(&date) {
        return;
    }

    let mut occurrence = Occurrence {
        id: occurrence_id(&template.series_id, date),
        series_id: template.series_id.clone(),
        date,
        time_of_day: rule.time_of_day.clone(),
        title: template.title.clone(),
        kind: template.kind,
        participants: template.participants.clone(),
        color: template.color.clone(),
        frequency: template.frequency,
    };

    if let Some(patch) = overrides.modified_instances.get(&date) {
        if let Some(title) = &patch.title {
            occurrence.title = title.clone();
        }
        if let Some(time) = &patch.time_of_day {
            occurrence.time_of_day = Some(time.clone());
        }
    }

    out.push(occurrence);
}

/// Advance a cursor by one frequency unit.
///
/// Month and year steps use chrono's calendar-aware `checked_add_months`,
/// which clamps into the shorter month (Jan 31 + 1 month = end of February).
/// The clamp is sticky under cursor stepping: a monthly series anchored on
/// the 31st settles onto the 29th after February of a leap year.
fn advance(cursor: NaiveDate, frequency: Frequency) -> TandemResult<NaiveDate> {
    let next = match frequency {
        Frequency::Daily => cursor.checked_add_days(Days::new(1)),
        Frequency::Weekly => cursor.checked_add_days(Days::new(7)),
        Frequency::Biweekly => cursor.checked_add_days(Days::new(14)),
        Frequency::Monthly => cursor.checked_add_months(Months::new(1)),
        Frequency::Yearly => cursor.checked_add_months(Months::new(12)),
    };

    next.ok_or_else(|| date_out_of_range(cursor))
}

fn date_out_of_range(from: NaiveDate) -> TandemError {
    TandemError::Validation(format!("Date arithmetic out of range past {}", from))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn make_template() -> OccurrenceTemplate {
        OccurrenceTemplate {
            series_id: "series-1".to_string(),
            title: "Date night".to_string(),
            kind: OccurrenceKind::Event,
            participants: vec!["sam".to_string(), "alex".to_string()],
            color: Some("#e07a5f".to_string()),
            frequency: Some(Frequency::Weekly),
        }
    }

    fn make_rule(anchor: &str, frequency: Frequency, end: Option<&str>) -> RecurrenceRule {
        RecurrenceRule {
            anchor_date: date(anchor),
            frequency,
            end_date: end.map(date),
            time_of_day: Some("18:00".to_string()),
            weekdays: Vec::new(),
        }
    }

    fn dates_of(occurrences: &[Occurrence]) -> Vec<String> {
        occurrences.iter().map(|o| o.date.to_string()).collect()
    }

    #[test]
    fn weekly_series_includes_inclusive_end_date() {
        // Scenario: weekly from 2024-03-01 through 2024-03-22.
        let rule = make_rule("2024-03-01", Frequency::Weekly, Some("2024-03-22"));
        let occurrences = expand(&rule, &OverrideSet::default(), &make_template(), 100).unwrap();

        assert_eq!(
            dates_of(&occurrences),
            vec!["2024-03-01", "2024-03-08", "2024-03-15", "2024-03-22"]
        );
    }

    #[test]
    fn excluded_date_is_suppressed() {
        let rule = make_rule("2024-03-01", Frequency::Weekly, Some("2024-03-22"));
        let mut overrides = OverrideSet::default();
        overrides.exclude(date("2024-03-15"));

        let occurrences = expand(&rule, &overrides, &make_template(), 100).unwrap();

        assert_eq!(
            dates_of(&occurrences),
            vec!["2024-03-01", "2024-03-08", "2024-03-22"]
        );
    }

    #[test]
    fn weekday_set_overrides_frequency_stepping() {
        // Mon/Wed/Fri between 2024-03-01 (a Friday) and 2024-03-10, with a
        // weekly frequency that must not influence advancement.
        let mut rule = make_rule("2024-03-01", Frequency::Weekly, Some("2024-03-10"));
        rule.weekdays = vec![1, 3, 5];

        let occurrences = expand(&rule, &OverrideSet::default(), &make_template(), 100).unwrap();

        assert_eq!(
            dates_of(&occurrences),
            vec!["2024-03-01", "2024-03-04", "2024-03-06", "2024-03-08"]
        );
    }

    #[test]
    fn monthly_from_jan_31_clamps_into_short_months() {
        // chrono clamps Jan 31 + 1 month to Feb 29 (2024 is a leap year) and
        // the clamp sticks for later steps.
        let rule = make_rule("2024-01-31", Frequency::Monthly, Some("2024-04-30"));
        let occurrences = expand(&rule, &OverrideSet::default(), &make_template(), 100).unwrap();

        assert_eq!(
            dates_of(&occurrences),
            vec!["2024-01-31", "2024-02-29", "2024-03-29", "2024-04-29"]
        );
    }

    #[test]
    fn biweekly_and_yearly_step_sizes() {
        let rule = make_rule("2024-03-01", Frequency::Biweekly, Some("2024-04-01"));
        let occurrences = expand(&rule, &OverrideSet::default(), &make_template(), 100).unwrap();
        assert_eq!(
            dates_of(&occurrences),
            vec!["2024-03-01", "2024-03-15", "2024-03-29"]
        );

        let rule = make_rule("2024-06-10", Frequency::Yearly, Some("2026-12-31"));
        let occurrences = expand(&rule, &OverrideSet::default(), &make_template(), 100).unwrap();
        assert_eq!(
            dates_of(&occurrences),
            vec!["2024-06-10", "2025-06-10", "2026-06-10"]
        );
    }

    #[test]
    fn modified_instance_patches_one_occurrence_only() {
        let rule = make_rule("2024-03-01", Frequency::Weekly, Some("2024-03-22"));
        let mut overrides = OverrideSet::default();
        overrides.patch(
            date("2024-03-08"),
            InstancePatch {
                title: Some("Anniversary dinner".to_string()),
                time_of_day: Some("20:00".to_string()),
            },
        );

        let occurrences = expand(&rule, &overrides, &make_template(), 100).unwrap();

        assert_eq!(occurrences[1].title, "Anniversary dinner");
        assert_eq!(occurrences[1].time_of_day.as_deref(), Some("20:00"));
        // Neighbours keep the rule's defaults.
        assert_eq!(occurrences[0].title, "Date night");
        assert_eq!(occurrences[0].time_of_day.as_deref(), Some("18:00"));
        assert_eq!(occurrences[2].title, "Date night");
    }

    #[test]
    fn end_date_before_anchor_yields_empty_sequence() {
        let rule = make_rule("2024-03-01", Frequency::Daily, Some("2024-02-01"));
        let occurrences = expand(&rule, &OverrideSet::default(), &make_template(), 100).unwrap();
        assert!(occurrences.is_empty());
    }

    #[test]
    fn open_ended_series_stops_at_cap() {
        let rule = make_rule("2024-03-01", Frequency::Daily, None);
        let occurrences = expand(&rule, &OverrideSet::default(), &make_template(), 100).unwrap();
        assert_eq!(occurrences.len(), 100);
    }

    #[test]
    fn open_ended_series_synthesizes_one_year_horizon() {
        // Weekly with no end date: one year of Fridays is 53 candidates, so a
        // generous cap must not run past anchor + 1 year.
        let rule = make_rule("2024-03-01", Frequency::Weekly, None);
        let occurrences = expand(&rule, &OverrideSet::default(), &make_template(), 100).unwrap();

        let last = occurrences.last().unwrap().date;
        assert!(last <= date("2025-03-01"));
        assert_eq!(occurrences.len(), 53);
    }

    #[test]
    fn dates_are_strictly_ascending_within_bounds() {
        let mut rule = make_rule("2024-01-01", Frequency::Daily, Some("2024-02-15"));
        rule.weekdays = vec![0, 2, 4, 6];

        let occurrences = expand(&rule, &OverrideSet::default(), &make_template(), 365).unwrap();

        for pair in occurrences.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
        for occ in &occurrences {
            assert!(occ.date >= date("2024-01-01"));
            assert!(occ.date <= date("2024-02-15"));
        }
    }

    #[test]
    fn expansion_is_idempotent() {
        let rule = make_rule("2024-03-01", Frequency::Weekly, None);
        let mut overrides = OverrideSet::default();
        overrides.exclude(date("2024-03-08"));

        let first = expand(&rule, &overrides, &make_template(), 100).unwrap();
        let second = expand(&rule, &overrides, &make_template(), 100).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn occurrence_ids_are_deterministic() {
        let rule = make_rule("2024-03-01", Frequency::Weekly, Some("2024-03-22"));
        let occurrences = expand(&rule, &OverrideSet::default(), &make_template(), 100).unwrap();

        assert_eq!(occurrences[0].id, "series-1__2024-03-01");
        assert_eq!(occurrences[3].id, "series-1__2024-03-22");
    }

    #[test]
    fn invalid_weekday_index_is_rejected() {
        let mut rule = make_rule("2024-03-01", Frequency::Weekly, None);
        rule.weekdays = vec![1, 7];

        let result = expand(&rule, &OverrideSet::default(), &make_template(), 100);
        assert!(matches!(result, Err(TandemError::Validation(_))));
    }

    #[test]
    fn unknown_frequency_string_is_rejected() {
        let result = "fortnightly".parse::<Frequency>();
        assert!(matches!(result, Err(TandemError::Validation(_))));
    }

    #[test]
    fn patch_merges_with_existing_entry() {
        let mut overrides = OverrideSet::default();
        overrides.patch(
            date("2024-03-08"),
            InstancePatch {
                title: Some("Dinner".to_string()),
                time_of_day: None,
            },
        );
        overrides.patch(
            date("2024-03-08"),
            InstancePatch {
                title: None,
                time_of_day: Some("19:30".to_string()),
            },
        );

        let entry = &overrides.modified_instances[&date("2024-03-08")];
        assert_eq!(entry.title.as_deref(), Some("Dinner"));
        assert_eq!(entry.time_of_day.as_deref(), Some("19:30"));
    }

    #[test]
    fn exclude_drops_any_pending_patch() {
        let mut overrides = OverrideSet::default();
        overrides.patch(
            date("2024-03-08"),
            InstancePatch {
                title: Some("Dinner".to_string()),
                time_of_day: None,
            },
        );
        overrides.exclude(date("2024-03-08"));

        assert!(overrides.modified_instances.is_empty());
        assert!(overrides.excluded_dates.contains(&date("2024-03-08")));
    }
}
