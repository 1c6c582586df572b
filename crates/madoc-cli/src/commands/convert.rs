//! Convert command - standalone currency conversion.

use chrono::NaiveDate;
use clap::Args;
use console::style;
use madoc_core::{convert_currency, Currency};

/// Arguments for the convert command.
#[derive(Args)]
pub struct ConvertArgs {
    /// Amount to convert
    #[arg(required = true)]
    amount: f64,

    /// Source currency code (MAD, USD, EUR, ...)
    #[arg(required = true)]
    from: Currency,

    /// Target currency code
    #[arg(required = true)]
    to: Currency,

    /// Historical rate date (YYYY-MM-DD)
    #[arg(long)]
    date: Option<NaiveDate>,
}

pub async fn run(args: ConvertArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let analyzer = super::build_analyzer(config_path)?;

    let conversion = convert_currency(
        analyzer.rate_cache(),
        args.amount,
        args.from,
        args.to,
        None,
        args.date,
    )
    .await;

    println!(
        "{} {} = {}",
        style(&conversion.formatted_original).bold(),
        style("→").dim(),
        style(&conversion.formatted_converted).bold().green(),
    );
    println!(
        "   rate {:.6} on {}{}{}",
        conversion.rate,
        conversion.date,
        if conversion.is_historical { " (historical)" } else { "" },
        if conversion.used_fallback {
            " [fallback rates]"
        } else {
            ""
        },
    );

    Ok(())
}
