//! Display service - formatted summaries for account, contact and activity lists
//!
//! Each list applies its own empty-identifier rule: account cards always
//! keep one identifier slot, contact and counterparty rows show nothing.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::result::Result;
use crate::domain::{order_trusted_devices, TransactionStatus, TrustedDevice};
use crate::ports::RecordSource;

/// Join identifier segments for inline display
pub fn join_segments(segments: &[String], separator: &str) -> String {
    segments.join(separator)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountCard {
    pub id: Uuid,
    pub name: String,
    pub currency: String,
    /// Never empty; may hold a single empty placeholder
    pub identifiers: Vec<String>,
    pub identifier_line: String,
    pub balance: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRow {
    pub id: Uuid,
    pub name: String,
    pub initials: String,
    /// Empty when the contact has nothing displayable
    pub identifiers: Vec<String>,
    pub identifier_line: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionLine {
    pub id: Uuid,
    pub account_id: Uuid,
    pub date: NaiveDate,
    pub title: String,
    pub amount: String,
    pub outgoing: bool,
    pub status: TransactionStatus,
    pub counterparty_identifiers: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRow {
    pub id: Uuid,
    pub name: String,
    pub platform: Option<String>,
    pub is_current: bool,
    pub last_seen_at: Option<DateTime<Utc>>,
}

impl From<TrustedDevice> for DeviceRow {
    fn from(device: TrustedDevice) -> Self {
        Self {
            id: device.id,
            name: device.name,
            platform: device.platform,
            is_current: device.is_current,
            last_seen_at: device.last_seen_at,
        }
    }
}

/// Builds display rows from a record source
pub struct DisplayService {
    source: Arc<dyn RecordSource>,
    separator: String,
}

impl DisplayService {
    pub fn new(source: Arc<dyn RecordSource>, separator: impl Into<String>) -> Self {
        Self {
            source,
            separator: separator.into(),
        }
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub async fn account_cards(&self) -> Result<Vec<AccountCard>> {
        let accounts = self.source.get_accounts().await?;
        Ok(accounts
            .into_iter()
            .map(|account| {
                let identifiers = account.display_identifiers();
                AccountCard {
                    id: account.id,
                    name: account.display_name().to_string(),
                    currency: account.currency.to_uppercase(),
                    identifier_line: join_segments(&identifiers, &self.separator),
                    identifiers,
                    balance: account.display_balance(),
                }
            })
            .collect())
    }

    /// Contacts sorted by name
    pub async fn contact_rows(&self) -> Result<Vec<ContactRow>> {
        let mut contacts = self.source.get_contacts().await?;
        contacts.sort_by_key(|c| c.name.to_lowercase());
        Ok(contacts
            .into_iter()
            .map(|contact| {
                let identifiers = contact.display_identifiers();
                let identifier_line = if identifiers.is_empty() {
                    None
                } else {
                    Some(join_segments(&identifiers, &self.separator))
                };
                ContactRow {
                    id: contact.id,
                    initials: contact.initials(),
                    name: contact.name,
                    identifiers,
                    identifier_line,
                }
            })
            .collect())
    }

    /// Newest first
    pub async fn transaction_lines(&self, account_id: Option<Uuid>) -> Result<Vec<TransactionLine>> {
        let mut transactions = self.source.get_transactions(account_id).await?;
        transactions.sort_by(|a, b| {
            b.transaction_date
                .cmp(&a.transaction_date)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(transactions
            .into_iter()
            .map(|tx| TransactionLine {
                id: tx.id,
                account_id: tx.account_id,
                date: tx.transaction_date,
                title: tx.title().to_string(),
                amount: tx.money().display(),
                outgoing: tx.is_outgoing(),
                status: tx.status,
                counterparty_identifiers: tx.counterparty_identifiers(),
            })
            .collect())
    }

    /// Transactions waiting for a second approver
    pub async fn pending_approvals(&self) -> Result<Vec<TransactionLine>> {
        Ok(self
            .transaction_lines(None)
            .await?
            .into_iter()
            .filter(|line| line.status == TransactionStatus::AwaitingApproval)
            .collect())
    }

    pub async fn trusted_devices(&self) -> Result<Vec<DeviceRow>> {
        let devices = self.source.get_trusted_devices().await?;
        Ok(order_trusted_devices(devices)
            .into_iter()
            .map(DeviceRow::from)
            .collect())
    }
}
