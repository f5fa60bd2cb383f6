//! Payline Core - PIN security and identifier formatting for business banking
//!
//! This crate implements the core logic following hexagonal architecture:
//!
//! - **domain**: Records, identifier/money formatting, PIN state (pure)
//! - **ports**: Trait definitions for external collaborators (PinStore, SessionService, Navigator, RecordSource)
//! - **services**: PIN flows, display rows, event logging
//! - **adapters**: Concrete implementations (PIN file, session file, JSON/demo records, in-memory)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use adapters::demo::DemoRecordSource;
use adapters::file_pin_store::FilePinStore;
use adapters::file_session::FileSession;
use adapters::json_records::JsonRecordSource;
use config::Config;
use ports::{Navigator, RecordSource};
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult};
pub use domain::{
    format_as_price, identifier_segments, identifier_slots, Account, BankIdentifier, Contact,
    Money, PinPhase, Transaction, TrustedDevice,
};
pub use services::{EntryPoint, LogEvent, LoggingService};

/// Main context for Payline operations
///
/// Wires the file-backed adapters in a data directory to the services.
pub struct PaylineContext {
    pub config: Config,
    pub data_dir: PathBuf,
    pub pin_store: Arc<FilePinStore>,
    pub session: Arc<FileSession>,
    pub logger: Arc<LoggingService>,
    pub display_service: DisplayService,
}

impl PaylineContext {
    /// Create a new Payline context
    ///
    /// Records are read from `records` when given, otherwise demo data is served.
    pub fn new(data_dir: &Path, records: Option<&Path>, entry_point: EntryPoint) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;
        let config = Config::load(data_dir)?;

        let source: Arc<dyn RecordSource> = match records {
            Some(path) => Arc::new(JsonRecordSource::new(path)),
            None => Arc::new(DemoRecordSource),
        };
        let logger = Arc::new(LoggingService::new(
            data_dir,
            entry_point,
            env!("CARGO_PKG_VERSION"),
        )?);

        Ok(Self {
            display_service: DisplayService::new(source, config.segment_separator.clone()),
            pin_store: Arc::new(FilePinStore::new(data_dir)),
            session: Arc::new(FileSession::new(data_dir)),
            logger,
            config,
            data_dir: data_dir.to_path_buf(),
        })
    }

    /// Start a PIN flow against this context's store and session
    pub async fn pin_service(&self, navigator: Arc<dyn Navigator>) -> Result<PinService> {
        let ports = PinPorts {
            store: self.pin_store.clone(),
            session: self.session.clone(),
            navigator,
        };
        let controller = PinController::start(ports, &self.config)
            .await?
            .with_logger(Arc::clone(&self.logger));
        Ok(PinService::from_controller(controller))
    }
}
