//! Rates command - print the exchange rate snapshot table.

use chrono::NaiveDate;
use clap::Args;
use console::style;
use madoc_core::{format_currency, Currency, ExchangeRateCache, SimulatedRateProvider};

/// Arguments for the rates command.
#[derive(Args)]
pub struct RatesArgs {
    /// Historical rate date (YYYY-MM-DD)
    #[arg(long)]
    date: Option<NaiveDate>,
}

pub async fn run(args: RatesArgs) -> anyhow::Result<()> {
    let cache = ExchangeRateCache::new(Box::new(SimulatedRateProvider));
    let snapshot = cache
        .snapshot(args.date)
        .await
        .map_err(|e| anyhow::anyhow!("failed to fetch rates: {e}"))?;

    println!(
        "{} Rates for 1 MAD ({}{})",
        style("ℹ").blue(),
        snapshot.source,
        if snapshot.is_historical {
            format!(", {}", args.date.unwrap())
        } else {
            String::new()
        },
    );
    println!();

    for currency in Currency::ALL {
        let rate = snapshot.rates[&currency];
        println!(
            "  {}  {:<16} {:>10.4}   {}",
            style(currency.code()).bold(),
            currency.display_name(),
            rate,
            style(format_currency(rate, currency)).dim(),
        );
    }

    Ok(())
}
