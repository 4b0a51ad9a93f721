use anyhow::Result;
use owo_colors::OwoColorize;
use tandem_core::household::Household;
use tandem_core::task::{Task, TaskStatus};

use crate::render::Render;

pub fn list(household: &Household) -> Result<()> {
    let mut tasks = household.tasks()?;
    tasks.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.title.cmp(&b.title)));

    if tasks.is_empty() {
        println!("{}", "The board is empty. Add a chore with: tandem chore".dimmed());
        return Ok(());
    }

    let open: Vec<_> = tasks.iter().filter(|t| t.status != TaskStatus::Approved).collect();
    let approved: Vec<_> = tasks.iter().filter(|t| t.status == TaskStatus::Approved).collect();

    for task in &open {
        println!("{}", task.render());
    }

    if !approved.is_empty() {
        println!();
        println!("{}", "Done and approved:".dimmed());
        for task in &approved {
            println!("{}", task.render().dimmed());
        }
    }

    Ok(())
}

pub fn claim(household: &Household, needle: &str, partner: &str) -> Result<()> {
    let known_partners = household.partners();
    if !known_partners.is_empty() && !known_partners.iter().any(|p| p == partner) {
        anyhow::bail!(
            "Unknown partner '{}'. This household is {}",
            partner,
            known_partners.join(" and ")
        );
    }

    let mut task = resolve(household, needle)?;
    task.claim(partner)?;
    household.update_task(&task.id, &task)?;

    println!("{}", format!("{} claimed '{}'", partner, task.title).green());
    Ok(())
}

pub fn done(household: &Household, needle: &str) -> Result<()> {
    let mut task = resolve(household, needle)?;
    task.complete()?;
    household.update_task(&task.id, &task)?;

    println!(
        "{}",
        format!("'{}' is waiting for a sign-off", task.title).green()
    );
    Ok(())
}

pub fn approve(household: &Household, needle: &str) -> Result<()> {
    let mut task = resolve(household, needle)?;
    task.approve()?;
    household.update_task(&task.id, &task)?;

    println!(
        "{}",
        format!("Approved '{}' (+{} pts)", task.title, task.points).green()
    );
    Ok(())
}

pub fn reject(household: &Household, needle: &str) -> Result<()> {
    let mut task = resolve(household, needle)?;
    task.reject()?;
    household.update_task(&task.id, &task)?;

    println!(
        "{}",
        format!("'{}' went back on the board", task.title).yellow()
    );
    Ok(())
}

/// Find a task by exact title, exact id, or id prefix.
fn resolve(household: &Household, needle: &str) -> Result<Task> {
    let tasks = household.tasks()?;

    let found = tasks
        .iter()
        .find(|t| t.title == needle || t.id == needle)
        .or_else(|| tasks.iter().find(|t| t.id.starts_with(needle)));

    match found {
        Some(task) => Ok(task.clone()),
        None => {
            let titles: Vec<_> = tasks.iter().map(|t| t.title.clone()).collect();
            anyhow::bail!("No chore matching '{}'. On the board: {}", needle, titles.join(", "))
        }
    }
}
