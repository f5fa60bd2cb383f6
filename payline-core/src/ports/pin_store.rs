//! Secure PIN store port

use async_trait::async_trait;

use crate::domain::result::Result;

/// Secure storage for the user's PIN
///
/// Implementations own the persisted hash. The core never sees it; it only
/// asks whether a PIN exists, whether a candidate matches, and stores a new one.
#[async_trait]
pub trait PinStore: Send + Sync {
    /// Whether a PIN has been set
    async fn has(&self) -> Result<bool>;

    /// Check a candidate PIN against the stored one
    async fn verify(&self, pin: &str) -> Result<bool>;

    /// Replace the stored PIN
    async fn set(&self, pin: &str) -> Result<()>;
}
