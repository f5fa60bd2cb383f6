//! Core domain entities
//!
//! All business entities and pure formatting rules are defined here.
//! No I/O or external service calls.

mod account;
mod contact;
mod device;
pub mod identifier;
pub mod money;
pub mod pin;
pub mod result;
mod transaction;

pub use account::Account;
pub use contact::Contact;
pub use device::{order_trusted_devices, TrustedDevice};
pub use identifier::{
    format_sort_code, identifier_segments, identifier_slots, mask_identifier, BankIdentifier,
    IdentifierRule,
};
pub use money::{format_amount, format_as_price, try_format_as_price, Money};
pub use pin::{AttemptCounter, AttemptOutcome, Exhaustion, LockoutPolicy, PinFields, PinPhase};
pub use transaction::{Counterparty, Transaction, TransactionStatus};
