//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external collaborators. The PIN
//! controller and display service depend only on these traits, not on
//! concrete implementations.

mod navigator;
mod pin_store;
mod record_source;
mod session;

pub use navigator::{Navigator, Screen};
pub use pin_store::PinStore;
pub use record_source::RecordSource;
pub use session::SessionService;
