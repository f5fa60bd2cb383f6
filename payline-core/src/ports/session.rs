//! Session port

use async_trait::async_trait;

use crate::domain::result::Result;

/// Authenticated session owner
#[async_trait]
pub trait SessionService: Send + Sync {
    /// End the session and clear any credentials it holds
    async fn logout(&self) -> Result<()>;
}
