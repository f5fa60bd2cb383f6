//! Logs command - inspect PIN activity and other recorded events

use anyhow::Result;
use chrono::{Duration, Local, Utc};
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;
use payline_core::services::{EventFilter, LogEntry, PinActivity, PinEvent};
use payline_core::{EntryPoint, LoggingService};

use super::get_data_dir;
use crate::output::{create_table, info, success};

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show recorded events, newest first
    List {
        /// Maximum number of events
        #[arg(short = 'n', long, default_value = "25")]
        limit: usize,
        /// Only this event, e.g. pin_incorrect
        #[arg(long)]
        event: Option<String>,
        /// Only events raised on this screen, e.g. security
        #[arg(long)]
        screen: Option<String>,
        /// Only PIN flow events
        #[arg(long)]
        pin: bool,
        /// Only lockouts and other failures
        #[arg(long)]
        failures: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Summarize PIN activity
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove events older than a number of days
    Prune {
        #[arg(long, default_value = "90")]
        days: i64,
        /// Don't ask for confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },
}

fn event_label(entry: &LogEntry) -> String {
    match entry.pin_event() {
        Some(PinEvent::LockoutLogout) | Some(PinEvent::ResetRequired) => {
            entry.event.red().bold().to_string()
        }
        Some(PinEvent::Incorrect) | Some(PinEvent::ConfirmationMismatch) => {
            entry.event.yellow().to_string()
        }
        Some(PinEvent::Updated) | Some(PinEvent::Validated) => entry.event.green().to_string(),
        None => entry.event.clone(),
    }
}

fn source(entry: &LogEntry) -> String {
    match (&entry.screen, &entry.command) {
        (Some(screen), _) => format!("{} screen", screen),
        (None, Some(command)) => format!("pl {}", command),
        (None, None) => String::new(),
    }
}

fn print_activity(activity: &PinActivity) {
    let row = |label: &str, n: u64| println!("  {:<24}{}", label, n);
    println!("{}", "PIN activity".bold());
    row("PIN changes", activity.updated);
    row("Successful checks", activity.validated);
    row("Wrong PIN entered", activity.incorrect);
    row("Confirmation mismatches", activity.confirmation_mismatches);
    row("Forced re-setups", activity.resets_required);
    if activity.lockouts > 0 {
        println!(
            "  {:<24}{}",
            "Lockouts",
            activity.lockouts.to_string().red().bold()
        );
    } else {
        row("Lockouts", 0);
    }
    if let Some(at) = activity.last_lockout {
        println!(
            "  {:<24}{}",
            "Last lockout",
            at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        );
    }
}

pub fn run(command: LogsCommands) -> Result<()> {
    let log = LoggingService::new(&get_data_dir()?, EntryPoint::Cli, env!("CARGO_PKG_VERSION"))?;

    match command {
        LogsCommands::List {
            limit,
            event,
            screen,
            pin,
            failures,
            json,
        } => {
            let filter = EventFilter {
                event,
                screen,
                pin_only: pin,
                failures_only: failures,
            };
            let entries = log.query(&filter, limit)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
                return Ok(());
            }
            if entries.is_empty() {
                println!("No matching events.");
                return Ok(());
            }

            let mut table = create_table();
            table.set_header(vec!["When", "Event", "Source", "Message"]);
            for entry in &entries {
                table.add_row(vec![
                    entry
                        .at
                        .with_timezone(&Local)
                        .format("%Y-%m-%d %H:%M:%S")
                        .to_string(),
                    event_label(entry),
                    source(entry),
                    entry.error.clone().unwrap_or_default(),
                ]);
            }
            println!("{}", table);
        }
        LogsCommands::Stats { json } => {
            let activity = log.pin_activity()?;
            let total = log.count()?;

            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "pin": activity,
                        "totalEvents": total,
                        "logPath": log.log_path(),
                    })
                );
                return Ok(());
            }

            print_activity(&activity);
            println!();
            info(&format!("{} events in {}", total, log.log_path().display()));
        }
        LogsCommands::Prune { days, force } => {
            let cutoff = Utc::now() - Duration::days(days.max(0));
            if !force {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Remove events older than {} days?", days))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let removed = log.prune_before(cutoff)?;
            success(&format!("Removed {} events", removed));
        }
    }

    Ok(())
}
