//! Shared constants.

/// Hard cap on occurrences expanded from one calendar event series.
pub const EVENT_OCCURRENCE_CAP: usize = 100;

/// Hard cap on calendar entries derived from one recurring chore. Chores can
/// repeat daily, so the cap covers a full year of them.
pub const TASK_OCCURRENCE_CAP: usize = 365;

/// Default agenda window: this many days either side of today.
pub const DEFAULT_AGENDA_DAYS: i64 = 30;
