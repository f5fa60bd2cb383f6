//! Event log - privacy-safe PIN and command events in a JSON-lines file
//!
//! Entries carry an event name plus the screen or CLI command it came from.
//! PINs, identifiers, amounts and payee names never reach the log.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const LOG_FILE: &str = "events.jsonl";

/// Where an event was raised from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryPoint {
    Cli,
    Mobile,
}

/// Events raised by the PIN flows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinEvent {
    Updated,
    ConfirmationMismatch,
    ResetRequired,
    Validated,
    Incorrect,
    LockoutLogout,
}

impl PinEvent {
    pub const ALL: [PinEvent; 6] = [
        PinEvent::Updated,
        PinEvent::ConfirmationMismatch,
        PinEvent::ResetRequired,
        PinEvent::Validated,
        PinEvent::Incorrect,
        PinEvent::LockoutLogout,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PinEvent::Updated => "pin_updated",
            PinEvent::ConfirmationMismatch => "pin_confirmation_mismatch",
            PinEvent::ResetRequired => "pin_reset_required",
            PinEvent::Validated => "pin_validated",
            PinEvent::Incorrect => "pin_incorrect",
            PinEvent::LockoutLogout => "pin_lockout_logout",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.name() == name)
    }
}

/// An event about to be recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    name: String,
    screen: Option<String>,
    command: Option<String>,
    error: Option<String>,
}

impl LogEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            screen: None,
            command: None,
            error: None,
        }
    }

    /// A PIN flow event raised on `screen`
    pub fn pin(event: PinEvent, screen: &str) -> Self {
        Self::new(event.name()).with_screen(screen)
    }

    pub fn with_screen(mut self, screen: impl Into<String>) -> Self {
        self.screen = Some(screen.into());
        self
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Mark the event as a failure with a user-facing message
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }
}

/// A recorded event as stored on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: Uuid,
    pub at: DateTime<Utc>,
    pub entry_point: EntryPoint,
    pub app_version: String,
    pub os: String,
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LogEntry {
    pub fn pin_event(&self) -> Option<PinEvent> {
        PinEvent::from_name(&self.event)
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Which entries a query returns
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub event: Option<String>,
    pub screen: Option<String>,
    pub pin_only: bool,
    pub failures_only: bool,
}

impl EventFilter {
    pub fn matches(&self, entry: &LogEntry) -> bool {
        self.event.as_deref().map_or(true, |e| entry.event == e)
            && self
                .screen
                .as_deref()
                .map_or(true, |s| entry.screen.as_deref() == Some(s))
            && (!self.pin_only || entry.pin_event().is_some())
            && (!self.failures_only || entry.is_failure())
    }
}

/// Counts of PIN flow events in the log
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PinActivity {
    pub updated: u64,
    pub validated: u64,
    pub incorrect: u64,
    pub confirmation_mismatches: u64,
    pub resets_required: u64,
    pub lockouts: u64,
    pub last_lockout: Option<DateTime<Utc>>,
}

impl PinActivity {
    fn add(&mut self, entry: &LogEntry) {
        let Some(event) = entry.pin_event() else {
            return;
        };
        match event {
            PinEvent::Updated => self.updated += 1,
            PinEvent::Validated => self.validated += 1,
            PinEvent::Incorrect => self.incorrect += 1,
            PinEvent::ConfirmationMismatch => self.confirmation_mismatches += 1,
            PinEvent::ResetRequired => self.resets_required += 1,
            PinEvent::LockoutLogout => {
                self.lockouts += 1;
                self.last_lockout = self.last_lockout.max(Some(entry.at));
            }
        }
    }
}

/// Append-only event log shared by the CLI and app
///
/// Appends and rewrites hold an exclusive `fs2` lock; reads hold a shared one.
pub struct LoggingService {
    log_path: PathBuf,
    entry_point: EntryPoint,
    app_version: String,
}

impl LoggingService {
    /// Open (creating if needed) events.jsonl in the data directory
    pub fn new(
        data_dir: &Path,
        entry_point: EntryPoint,
        app_version: impl Into<String>,
    ) -> Result<Self> {
        fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;
        let log_path = data_dir.join(LOG_FILE);
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Failed to open event log: {:?}", log_path))?;

        Ok(Self {
            log_path,
            entry_point,
            app_version: app_version.into(),
        })
    }

    pub fn record(&self, event: LogEvent) -> Result<()> {
        let entry = LogEntry {
            id: Uuid::new_v4(),
            at: Utc::now(),
            entry_point: self.entry_point,
            app_version: self.app_version.clone(),
            os: std::env::consts::OS.to_string(),
            event: event.name,
            screen: event.screen,
            command: event.command,
            error: event.error,
        };
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        file.lock_exclusive()?;
        let written = file.write_all(line.as_bytes());
        file.unlock()?;
        written.with_context(|| format!("Failed to append to {:?}", self.log_path))
    }

    /// Record that a CLI command ran
    pub fn record_command(&self, command: &str) -> Result<()> {
        self.record(LogEvent::new("command_run").with_command(command))
    }

    /// Entries in the order they were written; unreadable lines are skipped
    fn read_entries(&self) -> Result<Vec<LogEntry>> {
        let file = File::open(&self.log_path)?;
        file.lock_shared()?;
        let entries = parse_lines(&file);
        file.unlock()?;
        Ok(entries)
    }

    /// Matching entries, newest first, at most `limit`
    pub fn query(&self, filter: &EventFilter, limit: usize) -> Result<Vec<LogEntry>> {
        Ok(self
            .read_entries()?
            .into_iter()
            .rev()
            .filter(|e| filter.matches(e))
            .take(limit)
            .collect())
    }

    pub fn pin_activity(&self) -> Result<PinActivity> {
        let mut activity = PinActivity::default();
        for entry in self.read_entries()? {
            activity.add(&entry);
        }
        Ok(activity)
    }

    pub fn count(&self) -> Result<usize> {
        Ok(self.read_entries()?.len())
    }

    /// Drop entries older than `cutoff`, returning how many were removed
    pub fn prune_before(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let mut file = OpenOptions::new().read(true).write(true).open(&self.log_path)?;
        file.lock_exclusive()?;

        let entries = parse_lines(&file);
        let total = entries.len();
        let mut kept = String::new();
        let mut kept_count = 0;
        for entry in entries.iter().filter(|e| e.at >= cutoff) {
            kept.push_str(&serde_json::to_string(entry)?);
            kept.push('\n');
            kept_count += 1;
        }

        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(kept.as_bytes())?;
        file.unlock()?;

        Ok(total - kept_count)
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}

fn parse_lines(file: &File) -> Vec<LogEntry> {
    BufReader::new(file)
        .lines()
        .map_while(|line| line.ok())
        .filter_map(|line| serde_json::from_str(&line).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::tempdir;

    fn service(dir: &Path) -> LoggingService {
        LoggingService::new(dir, EntryPoint::Mobile, "1.2.0").unwrap()
    }

    #[test]
    fn test_pin_event_names_round_trip() {
        for event in PinEvent::ALL {
            assert_eq!(PinEvent::from_name(event.name()), Some(event));
        }
        assert_eq!(PinEvent::from_name("accounts_listed"), None);
    }

    #[test]
    fn test_record_stamps_entry() {
        let dir = tempdir().unwrap();
        let log = service(dir.path());
        log.record(LogEvent::pin(PinEvent::Updated, "security")).unwrap();

        let entries = log.query(&EventFilter::default(), 10).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].event, "pin_updated");
        assert_eq!(entries[0].screen.as_deref(), Some("security"));
        assert_eq!(entries[0].entry_point, EntryPoint::Mobile);
        assert_eq!(entries[0].app_version, "1.2.0");
        assert_eq!(entries[0].pin_event(), Some(PinEvent::Updated));
    }

    #[test]
    fn test_query_is_newest_first_and_filtered() {
        let dir = tempdir().unwrap();
        let log = service(dir.path());
        log.record_command("accounts").unwrap();
        log.record(LogEvent::pin(PinEvent::Incorrect, "security")).unwrap();
        log.record(
            LogEvent::pin(PinEvent::LockoutLogout, "security").with_error("logged out"),
        )
        .unwrap();

        let all = log.query(&EventFilter::default(), 10).unwrap();
        let names: Vec<&str> = all.iter().map(|e| e.event.as_str()).collect();
        assert_eq!(names, vec!["pin_lockout_logout", "pin_incorrect", "command_run"]);

        let pin_only = EventFilter {
            pin_only: true,
            ..Default::default()
        };
        assert_eq!(log.query(&pin_only, 10).unwrap().len(), 2);

        let failures = EventFilter {
            failures_only: true,
            ..Default::default()
        };
        let failed = log.query(&failures, 10).unwrap();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].error.as_deref(), Some("logged out"));

        let by_name = EventFilter {
            event: Some("pin_incorrect".into()),
            ..Default::default()
        };
        assert_eq!(log.query(&by_name, 10).unwrap().len(), 1);

        assert_eq!(log.query(&EventFilter::default(), 1).unwrap().len(), 1);
    }

    #[test]
    fn test_pin_activity_counts() {
        let dir = tempdir().unwrap();
        let log = service(dir.path());
        for _ in 0..3 {
            log.record(LogEvent::pin(PinEvent::ConfirmationMismatch, "security"))
                .unwrap();
        }
        log.record(LogEvent::pin(PinEvent::Incorrect, "security")).unwrap();
        log.record(LogEvent::pin(PinEvent::LockoutLogout, "security").with_error("out"))
            .unwrap();
        log.record_command("devices").unwrap();

        let activity = log.pin_activity().unwrap();
        assert_eq!(activity.confirmation_mismatches, 3);
        assert_eq!(activity.incorrect, 1);
        assert_eq!(activity.lockouts, 1);
        assert_eq!(activity.updated, 0);
        assert!(activity.last_lockout.is_some());
    }

    #[test]
    fn test_prune_keeps_recent_entries() {
        let dir = tempdir().unwrap();
        let log = service(dir.path());
        log.record_command("contacts").unwrap();
        log.record_command("devices").unwrap();

        assert_eq!(log.prune_before(Utc::now() - Duration::days(1)).unwrap(), 0);
        assert_eq!(log.count().unwrap(), 2);

        assert_eq!(log.prune_before(Utc::now() + Duration::seconds(5)).unwrap(), 2);
        assert_eq!(log.count().unwrap(), 0);

        log.record_command("price").unwrap();
        assert_eq!(log.count().unwrap(), 1);
    }

    #[test]
    fn test_corrupt_lines_are_skipped() {
        let dir = tempdir().unwrap();
        let log = service(dir.path());
        log.record_command("accounts").unwrap();
        fs::write(
            log.log_path(),
            format!("not json\n{}", fs::read_to_string(log.log_path()).unwrap()),
        )
        .unwrap();

        assert_eq!(log.count().unwrap(), 1);
    }
}
