//! PIN commands - set, change and verify the app PIN

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Subcommand;
use colored::Colorize;
use dialoguer::{Confirm, Password};
use indicatif::{ProgressBar, ProgressStyle};
use payline_core::adapters::file_pin_store::pin_exists;
use payline_core::domain::result::Result as CoreResult;
use payline_core::domain::Exhaustion;
use payline_core::services::{PinOutcome, PinService};
use payline_core::ports::SessionService;
use payline_core::{Error, PinPhase};
use zeroize::Zeroizing;

use super::get_context;
use crate::output::{error, success, warning, ConsoleNavigator};

#[derive(Subcommand)]
pub enum PinCommands {
    /// Show whether a PIN is set and the lockout policy
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set a new PIN, verifying the current one first if it exists
    Change,
    /// Check the current PIN
    Verify,
    /// Forget the stored PIN and end the session
    Reset {
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },
}

fn prompt_for(phase: PinPhase) -> &'static str {
    match phase {
        PinPhase::Setup => "New PIN",
        PinPhase::Confirm => "Confirm new PIN",
        PinPhase::Enter | PinPhase::Locked => "Current PIN",
    }
}

fn read_pin(prompt: &str) -> Result<Zeroizing<String>> {
    let pin = Password::new().with_prompt(prompt).interact()?;
    Ok(Zeroizing::new(pin))
}

/// Submit with a spinner while the PIN is hashed or checked
async fn submit_with_spinner(service: &PinService, pin: &str) -> CoreResult<PinOutcome> {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message("Checking PIN...");
    pb.enable_steady_tick(Duration::from_millis(80));
    let result = service.submit(pin).await;
    pb.finish_and_clear();
    result
}

/// Report a failed submission; returns an error when the flow cannot continue
fn report_failure(e: Error) -> Result<()> {
    match e {
        Error::Validation(_) | Error::IncorrectPin { .. } | Error::ConfirmationMismatch { .. } => {
            warning(&e.to_string());
            Ok(())
        }
        Error::AttemptsExhausted(Exhaustion::ResetToSetup) => {
            warning(&e.to_string());
            Ok(())
        }
        e if e.is_session_fatal() => {
            error(&e.to_string());
            bail!("Locked out")
        }
        e => Err(e.into()),
    }
}

fn require_terminal() -> Result<()> {
    if atty::isnt(atty::Stream::Stdin) {
        bail!("PIN entry needs an interactive terminal");
    }
    Ok(())
}

pub async fn run(command: PinCommands) -> Result<()> {
    let ctx = get_context(None)?;

    match command {
        PinCommands::Status { json } => {
            let is_set = pin_exists(&ctx.data_dir);
            let updated_at = ctx.pin_store.updated_at()?;
            let session_active = ctx.session.is_active();

            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "pinSet": is_set,
                        "updatedAt": updated_at,
                        "maxAttempts": ctx.config.max_pin_attempts,
                        "pinLength": ctx.config.pin_length,
                        "sessionActive": session_active,
                    })
                );
                return Ok(());
            }

            println!("{}", "PIN".bold());
            if is_set {
                println!("  Status: {}", "set".green());
            } else {
                println!("  Status: {}", "not set".yellow());
            }
            if let Some(at) = updated_at {
                println!("  Last changed: {}", at.format("%Y-%m-%d %H:%M"));
            }
            println!("  Length: {} digits", ctx.config.pin_length);
            println!("  Attempts before lockout: {}", ctx.config.max_pin_attempts);
            println!(
                "  Session: {}",
                if session_active { "active" } else { "none" }
            );
        }
        PinCommands::Change => {
            require_terminal()?;
            let _ = ctx.logger.record_command("pin change");
            let service = ctx.pin_service(Arc::new(ConsoleNavigator)).await?;

            loop {
                let phase = service.status().await.phase;
                let pin = read_pin(prompt_for(phase))?;
                match submit_with_spinner(&service, &pin).await {
                    Ok(PinOutcome::Updated) => {
                        success("PIN updated");
                        break;
                    }
                    Ok(PinOutcome::AwaitingConfirmation) | Ok(PinOutcome::Validated) => {}
                    Err(e) => report_failure(e)?,
                }
            }
        }
        PinCommands::Verify => {
            require_terminal()?;
            if !pin_exists(&ctx.data_dir) {
                bail!("No PIN set. Run 'pl pin change' first.");
            }
            let _ = ctx.logger.record_command("pin verify");
            let service = ctx.pin_service(Arc::new(ConsoleNavigator)).await?;

            loop {
                let pin = read_pin(prompt_for(PinPhase::Enter))?;
                match submit_with_spinner(&service, &pin).await {
                    Ok(_) => {
                        success("PIN correct");
                        break;
                    }
                    Err(e) => report_failure(e)?,
                }
            }
        }
        PinCommands::Reset { force } => {
            if !pin_exists(&ctx.data_dir) {
                println!("No PIN set.");
                return Ok(());
            }
            if !force {
                let confirmed = Confirm::new()
                    .with_prompt("Forget the stored PIN? You will be logged out.")
                    .default(false)
                    .interact()?;
                if !confirmed {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            ctx.pin_store.clear()?;
            ctx.session.logout().await?;
            let _ = ctx.logger.record_command("pin reset");
            success("PIN removed. Run 'pl pin change' to set a new one.");
        }
    }

    Ok(())
}
