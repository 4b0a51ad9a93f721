use anyhow::Result;
use chrono::Utc;
use owo_colors::OwoColorize;
use tandem_core::household::Household;
use tandem_core::task::Task;

use super::new::{parse_date, parse_recurrence};

#[allow(clippy::too_many_arguments)]
pub fn run(
    household: &Household,
    title: String,
    points: u32,
    date: Option<String>,
    time: Option<String>,
    every: Option<String>,
    until: Option<String>,
    on: Option<String>,
) -> Result<()> {
    let date = match date {
        Some(s) => parse_date(&s)?,
        None => Utc::now().date_naive(),
    };

    let mut task = Task::new(title, points, date);
    task.time_of_day = time;
    task.recurrence = parse_recurrence(every.as_deref(), until.as_deref(), on.as_deref())?;

    household.create_task(&task)?;

    println!(
        "{}",
        format!("Added to the board: {} ({} pts)", task.title, task.points).green()
    );
    Ok(())
}
