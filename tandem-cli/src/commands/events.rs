use anyhow::Result;
use owo_colors::OwoColorize;
use tandem_core::household::Household;

pub fn run(household: &Household) -> Result<()> {
    let mut events = household.events()?;
    events.sort_by(|a, b| a.date.cmp(&b.date));

    if events.is_empty() {
        println!("{}", "No events yet. Create one with: tandem new".dimmed());
        return Ok(());
    }

    for event in &events {
        let repeat = match &event.recurrence {
            Some(recurrence) => format!(" ({})", recurrence.frequency),
            None => String::new(),
        };
        let time = match &event.time_of_day {
            Some(t) => format!(" {}", t),
            None => String::new(),
        };

        println!(
            "{}{}  {}{}",
            event.date,
            time.dimmed(),
            event.title,
            repeat.dimmed()
        );
    }

    Ok(())
}
