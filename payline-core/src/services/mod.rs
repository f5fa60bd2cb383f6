//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

pub mod display;
pub mod logging;
pub mod pin;

pub use display::{AccountCard, ContactRow, DeviceRow, DisplayService, TransactionLine};
pub use logging::{
    EntryPoint, EventFilter, LogEntry, LogEvent, LoggingService, PinActivity, PinEvent,
};
pub use pin::{PinController, PinOutcome, PinPorts, PinService, PinStatus};
