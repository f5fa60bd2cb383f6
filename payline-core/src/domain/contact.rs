//! Contact (payee) domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::identifier::{identifier_segments, normalize_currency, BankIdentifier};

/// A saved payee
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    /// Currency of the payee's account, lowercase
    pub currency: String,
    #[serde(flatten)]
    pub identifier: BankIdentifier,
    #[serde(default)]
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Contact {
    pub fn new(id: Uuid, name: impl Into<String>, currency: &str) -> Self {
        Self {
            id,
            name: name.into(),
            currency: normalize_currency(currency),
            identifier: BankIdentifier::default(),
            email: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_identifier(mut self, identifier: BankIdentifier) -> Self {
        self.identifier = identifier;
        self
    }

    /// Identifier segments for a contact row; empty when there is nothing to show
    pub fn display_identifiers(&self) -> Vec<String> {
        identifier_segments(&self.identifier, &self.currency)
    }

    /// Up to two uppercase initials for the avatar badge
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}
