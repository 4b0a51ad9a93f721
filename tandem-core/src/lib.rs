//! Core types and domain logic for the tandem ecosystem.
//!
//! This crate provides everything shared by tandem-cli and tandem-server:
//! - `Event` and `Task` records and their file-backed store
//! - the recurrence expander that turns repeating series into dated
//!   occurrences
//! - scoped edit/delete semantics for recurring series
//! - the merged household agenda

pub mod agenda;
pub mod config;
pub mod constants;
pub mod date_range;
pub mod due;
pub mod error;
pub mod event;
pub mod household;
pub mod recurrence;
pub mod scope;
pub mod task;

pub use agenda::agenda;
pub use config::TandemConfig;
pub use date_range::DateRange;
pub use due::{due_state, DueState};
pub use error::{TandemError, TandemResult};
pub use event::{Event, Recurrence};
pub use household::Household;
pub use recurrence::{
    expand, Frequency, InstancePatch, Occurrence, OccurrenceKind, OccurrenceTemplate, OverrideSet,
    RecurrenceRule,
};
pub use scope::{
    delete_event_instance, delete_task_instance, edit_event_instance, EditScope, ScopedDelete,
};
pub use task::{Task, TaskStatus};
