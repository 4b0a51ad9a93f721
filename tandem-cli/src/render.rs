//! Terminal rendering for tandem-core types.
//!
//! Extension traits that add colored output using owo_colors.

use chrono::Utc;
use owo_colors::OwoColorize;
use tandem_core::due::DueState;
use tandem_core::recurrence::{Occurrence, OccurrenceKind};
use tandem_core::task::{Task, TaskStatus};

/// Extension trait for colored terminal rendering.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Occurrence {
    fn render(&self) -> String {
        let marker = match self.kind {
            OccurrenceKind::Event => "·".to_string(),
            OccurrenceKind::Task => match self.due_state(Utc::now()) {
                DueState::Overdue => "!".red().to_string(),
                _ => "○".to_string(),
            },
        };

        let time = match &self.time_of_day {
            Some(t) => t.clone(),
            None => "all day".to_string(),
        };

        let who = if self.participants.is_empty() {
            String::new()
        } else {
            format!(" [{}]", self.participants.join(", "))
        };

        format!(
            "{} {}  {} {}{}",
            marker,
            time.dimmed(),
            self.title,
            recurrence_tag(self).dimmed(),
            who.dimmed()
        )
    }
}

impl Render for Task {
    fn render(&self) -> String {
        let status = match self.status {
            TaskStatus::Open => self.status.as_str().to_string(),
            TaskStatus::Claimed => self.status.as_str().yellow().to_string(),
            TaskStatus::AwaitingApproval => self.status.as_str().cyan().to_string(),
            TaskStatus::Approved => self.status.as_str().green().to_string(),
        };

        let assignee = match &self.assignee {
            Some(partner) => format!(" @{}", partner),
            None => String::new(),
        };

        format!(
            "{} ({} pts) - {}{}",
            self.title,
            self.points,
            status,
            assignee.dimmed()
        )
    }
}

fn recurrence_tag(occurrence: &Occurrence) -> String {
    match occurrence.frequency {
        Some(frequency) => format!("({})", frequency),
        None => String::new(),
    }
}
