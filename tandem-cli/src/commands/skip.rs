use anyhow::Result;
use owo_colors::OwoColorize;
use tandem_core::household::Household;
use tandem_core::scope::{delete_event_instance, delete_task_instance, EditScope, ScopedDelete};

use super::new::parse_date;

/// Skip one occurrence of a recurring event or chore ("only this" scope).
pub fn run(household: &Household, needle: &str, date: &str) -> Result<()> {
    let date = parse_date(date)?;

    if let Some(mut event) = household
        .events()?
        .into_iter()
        .find(|e| e.title == needle || e.id == needle || e.id.starts_with(needle))
    {
        let outcome = delete_event_instance(&mut event, date, EditScope::OnlyThis)?;
        match outcome {
            ScopedDelete::UpdateSeries => household.update_event(&event.id, &event)?,
            ScopedDelete::RemoveSeries => household.delete_event(&event.id)?,
        }
        println!("{}", format!("Skipped '{}' on {}", event.title, date).green());
        return Ok(());
    }

    if let Some(mut task) = household
        .tasks()?
        .into_iter()
        .find(|t| t.title == needle || t.id == needle || t.id.starts_with(needle))
    {
        let outcome = delete_task_instance(&mut task, date, EditScope::OnlyThis)?;
        match outcome {
            ScopedDelete::UpdateSeries => household.update_task(&task.id, &task)?,
            ScopedDelete::RemoveSeries => household.delete_task(&task.id)?,
        }
        println!("{}", format!("Skipped '{}' on {}", task.title, date).green());
        return Ok(());
    }

    anyhow::bail!("No event or chore matching '{}'", needle)
}
