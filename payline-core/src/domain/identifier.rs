//! Bank identifier selection and formatting
//!
//! Picks which identifier a record is shown with, based on its currency:
//!
//! | currency | segments                                       |
//! |----------|------------------------------------------------|
//! | `gbp`    | account number, sort code grouped as `04-06-39` |
//! | `eur`    | IBAN, falling back to account number           |
//! | `usd`    | account number, falling back to IBAN           |
//! | other    | nothing                                        |
//!
//! Empty segments are always dropped. What happens when nothing is left
//! depends on where the identifier is shown: card-style slots get a single
//! empty placeholder ([`identifier_slots`]), list rows render nothing
//! ([`identifier_segments`]).

use serde::{Deserialize, Serialize};

/// Bullet used when masking identifiers
pub const MASK_CHAR: char = '•';

/// Raw identifier fields as supplied by the record source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankIdentifier {
    #[serde(default)]
    pub account_number: Option<String>,
    #[serde(default)]
    pub sort_code: Option<String>,
    #[serde(default)]
    pub iban: Option<String>,
}

impl BankIdentifier {
    /// UK-style identifier
    pub fn uk(account_number: impl Into<String>, sort_code: impl Into<String>) -> Self {
        Self {
            account_number: Some(account_number.into()),
            sort_code: Some(sort_code.into()),
            iban: None,
        }
    }

    /// IBAN-only identifier
    pub fn iban(iban: impl Into<String>) -> Self {
        Self {
            account_number: None,
            sort_code: None,
            iban: Some(iban.into()),
        }
    }
}

/// Which identifier rule applies to a currency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierRule {
    /// Account number plus sort code
    SortCode,
    /// IBAN first, account number as fallback
    IbanFirst,
    /// Account number first, IBAN as fallback
    AccountNumberFirst,
    /// No identifier shown
    Hidden,
}

impl IdentifierRule {
    /// Resolve the rule for a currency code (case-insensitive)
    pub fn for_currency(currency: &str) -> Self {
        match normalize_currency(currency).as_str() {
            "gbp" => Self::SortCode,
            "eur" => Self::IbanFirst,
            "usd" => Self::AccountNumberFirst,
            _ => Self::Hidden,
        }
    }
}

/// Normalize a currency code to trimmed lowercase
pub fn normalize_currency(currency: &str) -> String {
    currency.trim().to_lowercase()
}

/// Treat `None` and `""` the same way
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Ordered identifier segments for a record, with empty segments dropped
///
/// May return an empty list. Row-style call sites (contacts, counterparties)
/// use this directly and render nothing when it is empty.
pub fn identifier_segments(record: &BankIdentifier, currency: &str) -> Vec<String> {
    let candidates: Vec<Option<String>> = match IdentifierRule::for_currency(currency) {
        IdentifierRule::SortCode => vec![
            record.account_number.clone(),
            record.sort_code.as_deref().map(format_sort_code),
        ],
        IdentifierRule::IbanFirst => match non_empty(&record.iban) {
            Some(iban) => vec![Some(iban.to_string())],
            None => vec![record.account_number.clone()],
        },
        IdentifierRule::AccountNumberFirst => match non_empty(&record.account_number) {
            Some(number) => vec![Some(number.to_string())],
            None => vec![record.iban.clone()],
        },
        IdentifierRule::Hidden => Vec::new(),
    };

    candidates
        .into_iter()
        .flatten()
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Identifier segments for slot-style call sites (account cards, detail headers)
///
/// Never empty: a single empty placeholder keeps the display slot.
pub fn identifier_slots(record: &BankIdentifier, currency: &str) -> Vec<String> {
    let segments = identifier_segments(record, currency);
    if segments.is_empty() {
        vec![String::new()]
    } else {
        segments
    }
}

/// Strip non-digits and group in pairs: `"04 06 39"` -> `"04-06-39"`
///
/// The last group may be shorter than two digits.
pub fn format_sort_code(sort_code: &str) -> String {
    let digits: Vec<char> = sort_code.chars().filter(|c| c.is_ascii_digit()).collect();
    digits
        .chunks(2)
        .map(|pair| pair.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("-")
}

/// Hide all but the last `visible` characters: `"00002972"` -> `"••••2972"`
///
/// Four mask characters are shown regardless of the hidden length so the
/// real length is not revealed.
pub fn mask_identifier(value: &str, visible: usize) -> String {
    let chars: Vec<char> = value.chars().filter(|c| !c.is_whitespace()).collect();
    if chars.len() <= visible {
        return chars.into_iter().collect();
    }
    let tail: String = chars[chars.len() - visible..].iter().collect();
    format!("{}{}", MASK_CHAR.to_string().repeat(4), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    const IBAN: &str = "DE89370400440532013000";

    #[test]
    fn test_gbp_account_number_and_sort_code() {
        let record = BankIdentifier::uk("00002972", "040639");
        assert_eq!(
            identifier_segments(&record, "gbp"),
            vec!["00002972".to_string(), "04-06-39".to_string()]
        );
    }

    #[test]
    fn test_currency_is_case_insensitive() {
        let record = BankIdentifier::uk("00002972", "040639");
        assert_eq!(
            identifier_segments(&record, "GBP"),
            identifier_segments(&record, "gbp")
        );
    }

    #[test]
    fn test_gbp_missing_account_number_keeps_sort_code() {
        let record = BankIdentifier {
            sort_code: Some("04-06-39".to_string()),
            ..Default::default()
        };
        assert_eq!(identifier_segments(&record, "gbp"), vec!["04-06-39"]);
    }

    #[test]
    fn test_eur_prefers_iban() {
        let record = BankIdentifier {
            account_number: Some("12345678".to_string()),
            sort_code: None,
            iban: Some(IBAN.to_string()),
        };
        assert_eq!(identifier_segments(&record, "eur"), vec![IBAN]);
    }

    #[test]
    fn test_eur_falls_back_to_account_number() {
        let record = BankIdentifier {
            account_number: Some("12345678".to_string()),
            sort_code: None,
            iban: Some(String::new()),
        };
        assert_eq!(identifier_segments(&record, "eur"), vec!["12345678"]);
    }

    #[test]
    fn test_usd_empty_account_number_uses_iban() {
        let record = BankIdentifier {
            account_number: Some(String::new()),
            sort_code: None,
            iban: Some(IBAN.to_string()),
        };
        assert_eq!(identifier_segments(&record, "usd"), vec![IBAN]);
    }

    #[test]
    fn test_usd_prefers_account_number() {
        let record = BankIdentifier {
            account_number: Some("987654321".to_string()),
            sort_code: None,
            iban: Some(IBAN.to_string()),
        };
        assert_eq!(identifier_segments(&record, "usd"), vec!["987654321"]);
    }

    #[test]
    fn test_other_currency_has_no_segments() {
        let record = BankIdentifier::uk("00002972", "040639");
        assert!(identifier_segments(&record, "chf").is_empty());
        assert_eq!(identifier_slots(&record, "chf"), vec![String::new()]);
    }

    #[test]
    fn test_slots_keep_segments_when_present() {
        let record = BankIdentifier::iban(IBAN);
        assert_eq!(identifier_slots(&record, "eur"), vec![IBAN]);
    }

    #[test]
    fn test_empty_record_per_call_site() {
        let record = BankIdentifier::default();
        assert!(identifier_segments(&record, "gbp").is_empty());
        assert_eq!(identifier_slots(&record, "gbp"), vec![String::new()]);
    }

    #[test]
    fn test_sort_code_grouping() {
        assert_eq!(format_sort_code("040639"), "04-06-39");
        assert_eq!(format_sort_code("04 06-39"), "04-06-39");
        assert_eq!(format_sort_code("04063"), "04-06-3");
        assert_eq!(format_sort_code("ab"), "");
    }

    #[test]
    fn test_mask_identifier() {
        assert_eq!(mask_identifier("00002972", 4), "••••2972");
        assert_eq!(mask_identifier("DE89 3704 0044", 4), "••••0044");
        assert_eq!(mask_identifier("123", 4), "123");
    }

    #[test]
    fn test_formatting_is_repeatable() {
        let record = BankIdentifier::uk("00002972", "040639");
        let first = identifier_segments(&record, "gbp");
        let second = identifier_segments(&record, "gbp");
        assert_eq!(first, second);
    }
}
