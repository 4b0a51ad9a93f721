pub mod agenda;
pub mod chore;
pub mod events;
pub mod new;
pub mod skip;
pub mod tasks;
