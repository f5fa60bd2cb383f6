//! Record listing commands - accounts, contacts, transactions, devices

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use payline_core::domain::{mask_identifier, TransactionStatus};
use payline_core::services::display::join_segments;
use payline_core::LogEvent;
use uuid::Uuid;

use super::get_context;
use crate::output::{amount_cell, create_table, info};

/// Digits left visible when identifiers are masked
const VISIBLE_DIGITS: usize = 4;

fn mask_all(segments: &[String]) -> Vec<String> {
    segments
        .iter()
        .map(|s| mask_identifier(s, VISIBLE_DIGITS))
        .collect()
}

fn status_label(status: TransactionStatus) -> String {
    match status {
        TransactionStatus::Pending => "pending".dimmed().to_string(),
        TransactionStatus::AwaitingApproval => "needs approval".yellow().to_string(),
        TransactionStatus::Completed => "completed".to_string(),
        TransactionStatus::Rejected => "rejected".red().to_string(),
    }
}

pub async fn run_accounts(records: Option<&Path>, mask: bool, json: bool) -> Result<()> {
    let ctx = get_context(records)?;
    let mut cards = ctx.display_service.account_cards().await?;
    if mask {
        for card in &mut cards {
            card.identifiers = mask_all(&card.identifiers);
            card.identifier_line = join_segments(&card.identifiers, &ctx.config.segment_separator);
        }
    }
    let _ = ctx.logger.record(LogEvent::new("accounts_listed").with_command("accounts"));

    if json {
        println!("{}", serde_json::to_string_pretty(&cards)?);
        return Ok(());
    }

    if cards.is_empty() {
        println!("No accounts found.");
        return Ok(());
    }

    let mut table = create_table();
    table.set_header(vec!["Account", "Currency", "Identifier", "Balance"]);
    for card in &cards {
        table.add_row(vec![
            card.name.clone(),
            card.currency.clone(),
            card.identifier_line.clone(),
            amount_cell(&card.balance, card.balance.starts_with('-')),
        ]);
    }
    println!("{}", table);
    info(&format!("Source: {}", ctx.display_service.source_name()));
    Ok(())
}

pub async fn run_contacts(records: Option<&Path>, mask: bool, json: bool) -> Result<()> {
    let ctx = get_context(records)?;
    let mut rows = ctx.display_service.contact_rows().await?;
    if mask {
        for row in rows.iter_mut().filter(|r| !r.identifiers.is_empty()) {
            row.identifiers = mask_all(&row.identifiers);
            row.identifier_line = Some(join_segments(
                &row.identifiers,
                &ctx.config.segment_separator,
            ));
        }
    }
    let _ = ctx.logger.record(LogEvent::new("contacts_listed").with_command("contacts"));

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No contacts found.");
        return Ok(());
    }

    let mut table = create_table();
    table.set_header(vec!["", "Name", "Identifier"]);
    for row in &rows {
        table.add_row(vec![
            row.initials.bold().to_string(),
            row.name.clone(),
            row.identifier_line.clone().unwrap_or_default(),
        ]);
    }
    println!("{}", table);
    Ok(())
}

pub async fn run_transactions(
    records: Option<&Path>,
    account_id: Option<&str>,
    pending: bool,
    json: bool,
) -> Result<()> {
    let account_id = account_id
        .map(|id| Uuid::parse_str(id).with_context(|| format!("Invalid account ID: {}", id)))
        .transpose()?;

    let ctx = get_context(records)?;
    let lines = if pending {
        let mut lines = ctx.display_service.pending_approvals().await?;
        if let Some(id) = account_id {
            lines.retain(|line| line.account_id == id);
        }
        lines
    } else {
        ctx.display_service.transaction_lines(account_id).await?
    };
    let _ = ctx
        .logger
        .record(LogEvent::new("transactions_listed").with_command("transactions"));

    if json {
        println!("{}", serde_json::to_string_pretty(&lines)?);
        return Ok(());
    }

    if lines.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    let separator = &ctx.config.segment_separator;
    let mut table = create_table();
    table.set_header(vec!["Date", "Description", "Payee account", "Amount", "Status"]);
    for line in &lines {
        table.add_row(vec![
            line.date.format("%Y-%m-%d").to_string(),
            line.title.clone(),
            join_segments(&line.counterparty_identifiers, separator),
            amount_cell(&line.amount, line.outgoing),
            status_label(line.status),
        ]);
    }
    println!("{}", table);
    Ok(())
}

pub async fn run_devices(records: Option<&Path>, json: bool) -> Result<()> {
    let ctx = get_context(records)?;
    let devices = ctx.display_service.trusted_devices().await?;
    let _ = ctx.logger.record(LogEvent::new("devices_listed").with_command("devices"));

    if json {
        println!("{}", serde_json::to_string_pretty(&devices)?);
        return Ok(());
    }

    if devices.is_empty() {
        println!("No trusted devices.");
        return Ok(());
    }

    let mut table = create_table();
    table.set_header(vec!["Device", "Platform", "Last seen"]);
    for device in &devices {
        let name = if device.is_current {
            format!("{} {}", device.name, "(this device)".green())
        } else {
            device.name.clone()
        };
        table.add_row(vec![
            name,
            device.platform.clone().unwrap_or_default(),
            device
                .last_seen_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "never".to_string()),
        ]);
    }
    println!("{}", table);
    Ok(())
}
