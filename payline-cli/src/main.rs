//! Payline CLI - business banking security and display tools

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{logs, pin, price, records, session};

/// Payline - business banking in your terminal
#[derive(Parser)]
#[command(name = "pl", version, about, long_about = None)]
struct Cli {
    /// JSON records snapshot to read (demo data when omitted)
    #[arg(long, global = true, env = "PAYLINE_RECORDS")]
    records: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List accounts with their identifiers and balances
    Accounts {
        /// Hide all but the last digits of each identifier
        #[arg(long)]
        mask: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List saved payees
    Contacts {
        /// Hide all but the last digits of each identifier
        #[arg(long)]
        mask: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List recent transactions
    Transactions {
        /// Only show this account
        #[arg(long)]
        account_id: Option<String>,
        /// Only show transactions awaiting approval
        #[arg(long)]
        pending: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List trusted devices
    Devices {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Format an amount for display
    Price {
        /// Raw amount, e.g. -1234.5
        #[arg(allow_hyphen_values = true)]
        value: String,
        /// Currency code
        #[arg(default_value = "GBP")]
        currency: String,
        /// Reject malformed amounts instead of showing zero
        #[arg(long)]
        strict: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage the app PIN
    Pin {
        #[command(subcommand)]
        command: pin::PinCommands,
    },

    /// Start a session
    Login {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// End the current session
    Logout,

    /// View and manage event logs
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("PAYLINE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let records = cli.records.as_deref();
    match cli.command {
        Commands::Accounts { mask, json } => records::run_accounts(records, mask, json).await,
        Commands::Contacts { mask, json } => records::run_contacts(records, mask, json).await,
        Commands::Transactions { account_id, pending, json } => {
            records::run_transactions(records, account_id.as_deref(), pending, json).await
        }
        Commands::Devices { json } => records::run_devices(records, json).await,
        Commands::Price {
            value,
            currency,
            strict,
            json,
        } => price::run(&value, &currency, strict, json),
        Commands::Pin { command } => pin::run(command).await,
        Commands::Login { json } => session::run_login(json),
        Commands::Logout => session::run_logout().await,
        Commands::Logs { command } => logs::run(command),
    }
}
