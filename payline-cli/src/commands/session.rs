//! Session commands - login and logout

use anyhow::Result;
use payline_core::adapters::file_session::FileSession;
use payline_core::ports::SessionService;
use payline_core::LogEvent;

use super::{get_data_dir, get_logger, log_event};
use crate::output::{info, success};

pub fn run_login(json: bool) -> Result<()> {
    let session = FileSession::new(get_data_dir()?);
    let replaced = session.is_active();
    let started = session.start()?;

    let logger = get_logger();
    log_event(&logger, LogEvent::new("session_started").with_command("login"));

    if json {
        println!("{}", serde_json::to_string_pretty(&started)?);
        return Ok(());
    }

    if replaced {
        info("Previous session replaced");
    }
    success(&format!(
        "Session started at {}",
        started.started_at.format("%Y-%m-%d %H:%M:%S")
    ));
    Ok(())
}

pub async fn run_logout() -> Result<()> {
    let session = FileSession::new(get_data_dir()?);
    if !session.is_active() {
        info("No active session");
        return Ok(());
    }

    session.logout().await?;

    let logger = get_logger();
    log_event(&logger, LogEvent::new("session_ended").with_command("logout"));
    success("Logged out");
    Ok(())
}
