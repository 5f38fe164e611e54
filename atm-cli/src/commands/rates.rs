//! Rates command - show the configured exchange rate table

use anyhow::Result;
use colored::Colorize;
use rust_decimal::Decimal;

use super::get_context;
use crate::output;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context(false)?;
    let rates = &ctx.config.rates;

    if json {
        println!("{}", serde_json::to_string_pretty(rates)?);
        return Ok(());
    }

    println!("{}", "Exchange Rates".bold());
    println!();

    let mut table = output::create_table();
    table.set_header(vec![
        "Currency".to_string(),
        format!("Per 1 {}", rates.base()),
        format!("{} per unit", rates.base()),
    ]);

    for (code, rate) in rates.entries() {
        let inverse = (Decimal::ONE / rate).round_dp(4);
        table.add_row(vec![code.to_string(), rate.to_string(), inverse.to_string()]);
    }

    println!("{}", table);
    println!();
    output::info(&format!(
        "Balances are kept in {}; other currencies are converted at these rates.",
        rates.base()
    ));

    Ok(())
}
