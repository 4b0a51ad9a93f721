//! Chores and their lifecycle.
//!
//! A task moves through an explicit state machine driven by the two partners:
//! one claims and finishes it, the other signs it off (or sends it back).
//! Recurring chores also surface on the calendar as task-derived entries, via
//! the same expander the events use.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::TASK_OCCURRENCE_CAP;
use crate::error::{TandemError, TandemResult};
use crate::event::Recurrence;
use crate::recurrence::{
    expand, Frequency, Occurrence, OccurrenceKind, OccurrenceTemplate, OverrideSet, RecurrenceRule,
};

/// Lifecycle state of a chore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Up for grabs.
    Open,
    /// One partner has taken it on.
    Claimed,
    /// Finished, waiting for the other partner's sign-off.
    AwaitingApproval,
    /// Signed off; points are earned.
    Approved,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Open => "open",
            TaskStatus::Claimed => "claimed",
            TaskStatus::AwaitingApproval => "awaiting approval",
            TaskStatus::Approved => "approved",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A chore on the shared board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// What completing this chore is worth.
    pub points: u32,
    /// Partner the chore is assigned to, if claimed or pre-assigned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    pub status: TaskStatus,
    /// Due date, or the series anchor when recurring.
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
    #[serde(default, skip_serializing_if = "OverrideSet::is_empty")]
    pub overrides: OverrideSet,
}

impl Task {
    pub fn new(title: String, points: u32, date: NaiveDate) -> Self {
        Task {
            id: Uuid::new_v4().to_string(),
            title,
            description: None,
            points,
            assignee: None,
            status: TaskStatus::Open,
            date,
            time_of_day: None,
            recurrence: None,
            overrides: OverrideSet::default(),
        }
    }

    // =========================================================================
    // Lifecycle transitions
    // =========================================================================

    /// Open -> Claimed.
    pub fn claim(&mut self, partner: &str) -> TandemResult<()> {
        self.transition(TaskStatus::Open, TaskStatus::Claimed)?;
        self.assignee = Some(partner.to_string());
        Ok(())
    }

    /// Claimed -> AwaitingApproval.
    pub fn complete(&mut self) -> TandemResult<()> {
        self.transition(TaskStatus::Claimed, TaskStatus::AwaitingApproval)
    }

    /// AwaitingApproval -> Approved.
    pub fn approve(&mut self) -> TandemResult<()> {
        self.transition(TaskStatus::AwaitingApproval, TaskStatus::Approved)
    }

    /// AwaitingApproval -> Open. The partner's veto; the chore goes back up
    /// for grabs and loses its assignee.
    pub fn reject(&mut self) -> TandemResult<()> {
        self.transition(TaskStatus::AwaitingApproval, TaskStatus::Open)?;
        self.assignee = None;
        Ok(())
    }

    fn transition(&mut self, from: TaskStatus, to: TaskStatus) -> TandemResult<()> {
        if self.status != from {
            return Err(TandemError::Transition(format!(
                "'{}' is {}, expected {}",
                self.title, self.status, from
            )));
        }
        self.status = to;
        Ok(())
    }

    // =========================================================================
    // Calendar projection
    // =========================================================================

    /// The expander input for this chore; same degenerate-rule trick as
    /// events for one-offs.
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
            title: format!("{} ({} pts)", self.title, self.points),
            kind: OccurrenceKind::Task,
            participants: self.assignee.iter().cloned().collect(),
            color: None,
            frequency: self.recurrence.as_ref().map(|r| r.frequency),
        }
    }

    /// Expand this chore into calendar entries, capped at `max`.
    pub fn occurrences(&self, max: usize) -> TandemResult<Vec<Occurrence>> {
        expand(&self.rule(), &self.overrides, &self.template(), max)
    }

    /// Expand with the standard task cap.
    pub fn default_occurrences(&self) -> TandemResult<Vec<Occurrence>> {
        self.occurrences(TASK_OCCURRENCE_CAP)
    }
}
