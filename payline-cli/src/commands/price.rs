//! Price command - format a raw amount for display

use anyhow::Result;
use payline_core::domain::try_format_as_price;
use payline_core::{format_as_price, OperationResult};

use crate::output::warning;

pub fn run(value: &str, currency: &str, strict: bool, json: bool) -> Result<()> {
    let checked = try_format_as_price(value, currency);

    if json {
        let reply: OperationResult<String> = if strict {
            checked.into()
        } else {
            OperationResult::ok(format_as_price(value, currency))
        };
        println!("{}", serde_json::to_string_pretty(&reply)?);
        return Ok(());
    }

    if strict {
        println!("{}", checked?);
        return Ok(());
    }

    if checked.is_err() {
        warning(&format!("'{}' is not a number, showing zero", value));
    }
    println!("{}", format_as_price(value, currency));
    Ok(())
}
