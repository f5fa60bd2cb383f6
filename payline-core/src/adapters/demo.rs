//! Demo record source
//!
//! Fixed sample data covering every identifier rule:
//! - GBP, EUR and USD accounts plus one in an unsupported currency
//! - contacts with and without identifiers
//! - incoming, outgoing and awaiting-approval transactions
//! - a handful of trusted devices

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::result::Result;
use crate::domain::{
    Account, BankIdentifier, Contact, Counterparty, Transaction, TransactionStatus, TrustedDevice,
};
use crate::ports::RecordSource;

const GBP_ACCOUNT: Uuid = Uuid::from_u128(0x11111111_1111_1111_1111_111111111111);
const EUR_ACCOUNT: Uuid = Uuid::from_u128(0x22222222_2222_2222_2222_222222222222);
const USD_ACCOUNT: Uuid = Uuid::from_u128(0x33333333_3333_3333_3333_333333333333);
const CHF_ACCOUNT: Uuid = Uuid::from_u128(0x44444444_4444_4444_4444_444444444444);

/// Generate demo accounts
pub fn generate_demo_accounts() -> Vec<Account> {
    let mut operating = Account::new(GBP_ACCOUNT, "Business Current", "gbp")
        .with_identifier(BankIdentifier::uk("00002972", "040639"))
        .with_balance(Decimal::new(10089663012, 2)); // £100,896,630.12
    operating.nickname = Some("Operating".to_string());
    operating.account_type = Some("current".to_string());

    let mut euro = Account::new(EUR_ACCOUNT, "Euro Collections", "eur")
        .with_identifier(BankIdentifier::iban("DE89370400440532013000"))
        .with_balance(Decimal::new(4823047, 2)); // €48,230.47
    euro.account_type = Some("current".to_string());

    let mut dollar = Account::new(USD_ACCOUNT, "USD Payables", "usd")
        .with_identifier(BankIdentifier {
            account_number: Some("026009593".to_string()),
            sort_code: None,
            iban: None,
        })
        .with_balance(Decimal::new(-104000, 2)); // overdrawn $1,040.00
    dollar.account_type = Some("current".to_string());

    let franc = Account::new(CHF_ACCOUNT, "Swiss Reserve", "chf")
        .with_identifier(BankIdentifier::iban("CH9300762011623852957"))
        .with_balance(Decimal::new(1875000, 2));

    vec![operating, euro, dollar, franc]
}

/// Generate demo contacts
pub fn generate_demo_contacts() -> Vec<Contact> {
    vec![
        Contact::new(Uuid::from_u128(0xc1), "Northwind Trading", "gbp")
            .with_identifier(BankIdentifier::uk("41926819", "20-00-00")),
        Contact::new(Uuid::from_u128(0xc2), "Acme GmbH", "eur")
            .with_identifier(BankIdentifier::iban("DE75512108001245126199")),
        Contact::new(Uuid::from_u128(0xc3), "Globex Inc", "usd").with_identifier(
            BankIdentifier {
                account_number: Some(String::new()),
                sort_code: None,
                iban: Some("US64SVBKUS6S3300958879".to_string()),
            },
        ),
        // Nothing to show in the row
        Contact::new(Uuid::from_u128(0xc4), "Petty Cash", "gbp"),
    ]
}

/// Generate demo transactions for the last few days
pub fn generate_demo_transactions() -> Vec<Transaction> {
    let today = Utc::now().date_naive();
    let day = |offset: i64| -> NaiveDate { today - Duration::days(offset) };

    let mut supplier = Transaction::new(
        Uuid::from_u128(0x71),
        GBP_ACCOUNT,
        Decimal::new(-125000, 2),
        "gbp",
        day(1),
    );
    supplier.counterparty = Some(Counterparty {
        name: "Northwind Trading".to_string(),
        identifier: BankIdentifier::uk("41926819", "200000"),
    });

    let mut invoice = Transaction::new(
        Uuid::from_u128(0x72),
        EUR_ACCOUNT,
        Decimal::new(990050, 2),
        "eur",
        day(2),
    );
    invoice.counterparty = Some(Counterparty {
        name: "Acme GmbH".to_string(),
        identifier: BankIdentifier::iban("DE75512108001245126199"),
    });

    let mut payroll = Transaction::new(
        Uuid::from_u128(0x73),
        GBP_ACCOUNT,
        Decimal::new(-4200000, 2),
        "gbp",
        day(0),
    );
    payroll.description = Some("March payroll".to_string());
    payroll.status = TransactionStatus::AwaitingApproval;

    let mut card = Transaction::new(
        Uuid::from_u128(0x74),
        USD_ACCOUNT,
        Decimal::new(-1040, 2),
        "usd",
        day(3),
    );
    card.description = Some("Card payment".to_string());

    vec![supplier, invoice, payroll, card]
}

/// Generate demo trusted devices
pub fn generate_demo_devices() -> Vec<TrustedDevice> {
    let now = Utc::now();

    let mut phone = TrustedDevice::new(Uuid::from_u128(0xd1), "iPhone 15", now - Duration::days(90));
    phone.platform = Some("ios".to_string());
    phone.last_seen_at = Some(now);
    phone.is_current = true;

    let mut laptop = TrustedDevice::new(Uuid::from_u128(0xd2), "Office MacBook", now - Duration::days(200));
    laptop.platform = Some("macos".to_string());
    laptop.last_seen_at = Some(now - Duration::hours(5));

    let mut tablet = TrustedDevice::new(Uuid::from_u128(0xd3), "Warehouse tablet", now - Duration::days(30));
    tablet.platform = Some("android".to_string());

    vec![tablet, laptop, phone]
}

/// Record source serving the demo data
#[derive(Debug, Default)]
pub struct DemoRecordSource;

#[async_trait]
impl RecordSource for DemoRecordSource {
    fn name(&self) -> &str {
        "demo"
    }

    async fn get_accounts(&self) -> Result<Vec<Account>> {
        Ok(generate_demo_accounts())
    }

    async fn get_contacts(&self) -> Result<Vec<Contact>> {
        Ok(generate_demo_contacts())
    }

    async fn get_transactions(&self, account_id: Option<Uuid>) -> Result<Vec<Transaction>> {
        let transactions = generate_demo_transactions();
        Ok(match account_id {
            Some(id) => transactions.into_iter().filter(|t| t.account_id == id).collect(),
            None => transactions,
        })
    }

    async fn get_trusted_devices(&self) -> Result<Vec<TrustedDevice>> {
        Ok(generate_demo_devices())
    }
}
