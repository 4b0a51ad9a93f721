mod commands;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tandem_core::date_range::DateRange;
use tandem_core::household::Household;

#[derive(Parser)]
#[command(name = "tandem")]
#[command(about = "Shared calendar and chore board for the two of you")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the merged agenda of events and chores
    Agenda {
        /// Show entries from this date (YYYY-MM-DD, or "start" for all past entries)
        #[arg(long)]
        from: Option<String>,

        /// Show entries until this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
    /// List calendar event series
    Events,
    /// Create a calendar event
    New {
        title: String,

        /// Date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,

        /// Time of day (HH:MM)
        #[arg(short, long)]
        time: Option<String>,

        /// Repeat: daily, weekly, biweekly, monthly or yearly
        #[arg(short, long)]
        every: Option<String>,

        /// Last date of the series (YYYY-MM-DD)
        #[arg(short, long)]
        until: Option<String>,

        /// Repeat on weekdays instead (e.g. "mon,wed,fri")
        #[arg(short, long)]
        on: Option<String>,

        /// Partner names attending (defaults to both)
        #[arg(short, long)]
        with: Vec<String>,
    },
    /// Show the chore board
    Tasks,
    /// Add a chore to the board
    Chore {
        title: String,

        /// Points completing it is worth
        #[arg(short, long, default_value_t = 10)]
        points: u32,

        /// Due date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Time of day it should be done by (HH:MM)
        #[arg(short, long)]
        time: Option<String>,

        /// Repeat: daily, weekly, biweekly, monthly or yearly
        #[arg(short, long)]
        every: Option<String>,

        /// Last date of the series (YYYY-MM-DD)
        #[arg(short, long)]
        until: Option<String>,

        /// Repeat on weekdays instead (e.g. "sat,sun")
        #[arg(short, long)]
        on: Option<String>,
    },
    /// Claim a chore
    Claim {
        /// Chore title or id
        task: String,

        /// Which partner is claiming it
        partner: String,
    },
    /// Mark a claimed chore as finished
    Done {
        /// Chore title or id
        task: String,
    },
    /// Sign off a finished chore
    Approve {
        /// Chore title or id
        task: String,
    },
    /// Send a finished chore back to the board
    Reject {
        /// Chore title or id
        task: String,
    },
    /// Skip a single occurrence of a recurring event or chore
    Skip {
        /// Event or chore title or id
        series: String,

        /// Occurrence date to skip (YYYY-MM-DD)
        date: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let household = Household::load()?;

    match cli.command {
        Commands::Agenda { from, to } => {
            let range = DateRange::from_args(from.as_deref(), to.as_deref())
                .map_err(|e| anyhow::anyhow!(e))?;
            commands::agenda::run(&household, &range)
        }
        Commands::Events => commands::events::run(&household),
        Commands::New {
            title,
            date,
            time,
            every,
            until,
            on,
            with,
        } => commands::new::run(&household, title, &date, time, every, until, on, with),
        Commands::Tasks => commands::tasks::list(&household),
        Commands::Chore {
            title,
            points,
            date,
            time,
            every,
            until,
            on,
        } => commands::chore::run(&household, title, points, date, time, every, until, on),
        Commands::Claim { task, partner } => commands::tasks::claim(&household, &task, &partner),
        Commands::Done { task } => commands::tasks::done(&household, &task),
        Commands::Approve { task } => commands::tasks::approve(&household, &task),
        Commands::Reject { task } => commands::tasks::reject(&household, &task),
        Commands::Skip { series, date } => commands::skip::run(&household, &series, &date),
    }
}
