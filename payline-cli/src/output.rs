//! Output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use payline_core::ports::{Navigator, Screen};

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Color an amount red when it is outgoing
pub fn amount_cell(amount: &str, outgoing: bool) -> String {
    if outgoing {
        amount.red().to_string()
    } else {
        amount.green().to_string()
    }
}

/// Navigator that tells the user where the app would go next
pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn back(&self) {
        println!("{}", "← back".dimmed());
    }

    fn home(&self) {
        println!("{}", "⌂ returning home".dimmed());
    }

    fn go_to(&self, screen: Screen) {
        println!("{}", format!("→ {}", screen.as_str()).dimmed());
    }
}
