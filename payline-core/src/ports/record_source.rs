//! Record source port - accounts, contacts, transactions and devices
//!
//! Records arrive already fetched; retry and error semantics belong to the
//! implementation.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::result::Result;
use crate::domain::{Account, Contact, Transaction, TrustedDevice};

#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Source name (e.g., "json", "demo")
    fn name(&self) -> &str;

    async fn get_accounts(&self) -> Result<Vec<Account>>;

    async fn get_contacts(&self) -> Result<Vec<Contact>>;

    /// Transactions, optionally limited to one account
    async fn get_transactions(&self, account_id: Option<Uuid>) -> Result<Vec<Transaction>>;

    async fn get_trusted_devices(&self) -> Result<Vec<TrustedDevice>>;
}
