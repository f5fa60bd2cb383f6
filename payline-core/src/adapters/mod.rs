//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - Argon2id-hashed PIN file for the PinStore port
//! - session.json marker for the SessionService port
//! - JSON snapshot files and demo data for the RecordSource port
//! - In-memory store, session and navigator for tests and embedding

pub mod demo;
pub mod file_pin_store;
pub mod file_session;
pub mod json_records;
pub mod memory;
