//! Account domain model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::identifier::{identifier_slots, normalize_currency, BankIdentifier};
use super::money::format_amount;

/// A business account held with the bank
/// Note: account_type is a freeform string as supplied by the API.
/// Common values include "current", "savings", "card" but any string is accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub account_type: Option<String>,
    /// ISO 4217 currency code, normalized to lowercase
    pub currency: String,
    #[serde(default)]
    pub balance: Option<Decimal>,
    #[serde(flatten)]
    pub identifier: BankIdentifier,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with required fields
    pub fn new(id: Uuid, name: impl Into<String>, currency: &str) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            nickname: None,
            account_type: None,
            currency: normalize_currency(currency),
            balance: None,
            identifier: BankIdentifier::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_identifier(mut self, identifier: BankIdentifier) -> Self {
        self.identifier = identifier;
        self
    }

    pub fn with_balance(mut self, balance: Decimal) -> Self {
        self.balance = Some(balance);
        self
    }

    /// Nickname if set, otherwise the account name
    pub fn display_name(&self) -> &str {
        self.nickname
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.name)
    }

    /// Identifier segments for the account card (always at least one slot)
    pub fn display_identifiers(&self) -> Vec<String> {
        identifier_slots(&self.identifier, &self.currency)
    }

    /// Formatted balance, zero when the balance is unknown
    pub fn display_balance(&self) -> String {
        format_amount(
            self.balance.unwrap_or(Decimal::ZERO),
            &self.currency.to_uppercase(),
        )
    }

    /// Validate account data
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("account name cannot be empty");
        }
        if self.currency.trim().is_empty() {
            return Err("currency cannot be empty");
        }
        Ok(())
    }
}
