//! Transaction domain model

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::identifier::{identifier_segments, normalize_currency, BankIdentifier};
use super::money::Money;

/// Other side of a payment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Counterparty {
    pub name: String,
    #[serde(flatten)]
    pub identifier: BankIdentifier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    /// Waiting for a second approver
    AwaitingApproval,
    Completed,
    Rejected,
}

/// A single payment in or out of an account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub account_id: Uuid,
    /// Signed amount, negative for outgoing payments
    pub amount: Decimal,
    /// Lowercase currency code
    pub currency: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub counterparty: Option<Counterparty>,
    pub status: TransactionStatus,
    pub transaction_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(
        id: Uuid,
        account_id: Uuid,
        amount: Decimal,
        currency: &str,
        transaction_date: NaiveDate,
    ) -> Self {
        Self {
            id,
            account_id,
            amount,
            currency: normalize_currency(currency),
            description: None,
            counterparty: None,
            status: TransactionStatus::Completed,
            transaction_date,
            created_at: Utc::now(),
        }
    }

    pub fn money(&self) -> Money {
        Money::new(self.amount, &self.currency)
    }

    pub fn is_outgoing(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    /// Counterparty identifier segments; the currency is the transaction's
    pub fn counterparty_identifiers(&self) -> Vec<String> {
        self.counterparty
            .as_ref()
            .map(|c| identifier_segments(&c.identifier, &self.currency))
            .unwrap_or_default()
    }

    /// Counterparty name, falling back to the description
    pub fn title(&self) -> &str {
        self.counterparty
            .as_ref()
            .map(|c| c.name.as_str())
            .filter(|name| !name.is_empty())
            .or(self.description.as_deref())
            .unwrap_or("")
    }
}
