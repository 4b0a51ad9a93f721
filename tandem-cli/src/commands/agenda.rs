use anyhow::Result;
use owo_colors::OwoColorize;
use tandem_core::agenda::agenda;
use tandem_core::date_range::DateRange;
use tandem_core::household::Household;

use crate::render::Render;

pub fn run(household: &Household, range: &DateRange) -> Result<()> {
    let events = household.events()?;
    let tasks = household.tasks()?;

    let occurrences = agenda(&events, &tasks, range)?;

    if occurrences.is_empty() {
        println!("{}", "Nothing on the agenda.".dimmed());
        return Ok(());
    }

    let mut current_date = None;
    for occurrence in &occurrences {
        if current_date != Some(occurrence.date) {
            if current_date.is_some() {
                println!();
            }
            println!("{}", occurrence.date.format("%A, %B %-d").to_string().bold());
            current_date = Some(occurrence.date);
        }
        println!("  {}", occurrence.render());
    }

    Ok(())
}
