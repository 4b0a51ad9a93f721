use anyhow::{Context, Result};
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use tandem_core::event::{Event, Recurrence};
use tandem_core::household::Household;

#[allow(clippy::too_many_arguments)]
pub fn run(
    household: &Household,
    title: String,
    date: &str,
    time: Option<String>,
    every: Option<String>,
    until: Option<String>,
    on: Option<String>,
    with: Vec<String>,
) -> Result<()> {
    let date = parse_date(date)?;

    let mut event = Event::new(title, date);
    event.time_of_day = time;
    event.participants = with;
    event.recurrence = parse_recurrence(every.as_deref(), until.as_deref(), on.as_deref())?;

    household.create_event(&event)?;

    println!("{}", format!("Created: {}", event.title).green());
    Ok(())
}

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}'. Expected YYYY-MM-DD", s))
}

/// Build a Recurrence from the --every/--until/--on flags. A weekday set
/// without a frequency defaults to weekly, matching how the series will
/// actually advance.
pub(crate) fn parse_recurrence(
    every: Option<&str>,
    until: Option<&str>,
    on: Option<&str>,
) -> Result<Option<Recurrence>> {
    let weekdays = match on {
        Some(names) => parse_weekdays(names)?,
        None => Vec::new(),
    };

    let frequency = match every {
        Some(s) => Some(s.parse()?),
        None if !weekdays.is_empty() => Some(tandem_core::recurrence::Frequency::Weekly),
        None => None,
    };

    let Some(frequency) = frequency else {
        if until.is_some() {
            anyhow::bail!("--until only makes sense with --every or --on");
        }
        return Ok(None);
    };

    let until = until.map(parse_date).transpose()?;

    Ok(Some(Recurrence {
        frequency,
        until,
        weekdays,
    }))
}

/// Parse "mon,wed,fri" (or "1,3,5") into weekday indices, 0=Sunday.
fn parse_weekdays(names: &str) -> Result<Vec<u8>> {
    names
        .split(',')
        .map(|name| match name.trim().to_lowercase().as_str() {
            "sun" | "sunday" | "0" => Ok(0),
            "mon" | "monday" | "1" => Ok(1),
            "tue" | "tuesday" | "2" => Ok(2),
            "wed" | "wednesday" | "3" => Ok(3),
            "thu" | "thursday" | "4" => Ok(4),
            "fri" | "friday" | "5" => Ok(5),
            "sat" | "saturday" | "6" => Ok(6),
            other => anyhow::bail!("Unknown weekday '{}'", other),
        })
        .collect()
}
