//! JSON file record source
//!
//! Reads an API snapshot of the form:
//! ```json
//! {
//!   "accounts": [...],
//!   "contacts": [...],
//!   "transactions": [...],
//!   "trustedDevices": [...]
//! }
//! ```
//! Every section is optional. The file is re-read on each call so edits
//! show up without restarting.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{Account, Contact, Transaction, TrustedDevice};
use crate::ports::RecordSource;

/// Parsed snapshot file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSnapshot {
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub trusted_devices: Vec<TrustedDevice>,
}

pub struct JsonRecordSource {
    path: PathBuf,
}

impl JsonRecordSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> Result<RecordSnapshot> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| Error::records(format!("Failed to read {:?}: {}", self.path, e)))?;
        serde_json::from_str(&content)
            .map_err(|e| Error::records(format!("Invalid records file {:?}: {}", self.path, e)))
    }
}

#[async_trait]
impl RecordSource for JsonRecordSource {
    fn name(&self) -> &str {
        "json"
    }

    async fn get_accounts(&self) -> Result<Vec<Account>> {
        Ok(self.load().await?.accounts)
    }

    async fn get_contacts(&self) -> Result<Vec<Contact>> {
        Ok(self.load().await?.contacts)
    }

    async fn get_transactions(&self, account_id: Option<Uuid>) -> Result<Vec<Transaction>> {
        let transactions = self.load().await?.transactions;
        Ok(match account_id {
            Some(id) => transactions.into_iter().filter(|t| t.account_id == id).collect(),
            None => transactions,
        })
    }

    async fn get_trusted_devices(&self) -> Result<Vec<TrustedDevice>> {
        Ok(self.load().await?.trusted_devices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_partial_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("records.json");
        std::fs::write(
            &path,
            r#"{
                "contacts": [{
                    "id": "33333333-3333-3333-3333-333333333333",
                    "name": "Acme GmbH",
                    "currency": "eur",
                    "iban": "DE89370400440532013000",
                    "createdAt": "2025-01-15T10:30:00Z"
                }]
            }"#,
        )
        .unwrap();

        let source = JsonRecordSource::new(&path);
        assert!(source.get_accounts().await.unwrap().is_empty());
        let contacts = source.get_contacts().await.unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].display_identifiers(), vec!["DE89370400440532013000"]);
    }

    #[tokio::test]
    async fn test_missing_file_is_records_error() {
        let dir = tempdir().unwrap();
        let source = JsonRecordSource::new(dir.path().join("missing.json"));
        assert!(matches!(source.get_accounts().await, Err(Error::Records(_))));
    }
}
