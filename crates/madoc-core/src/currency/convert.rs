//! Currency conversion through the MAD triangulation base, and
//! locale-aware formatting.

use chrono::{NaiveDate, Utc};
use tracing::warn;

use crate::error::RateError;
use crate::models::analysis::Conversion;

use super::catalog::{default_rates, Currency, RateTable};
use super::rates::ExchangeRateCache;

/// Convert an amount between currencies.
///
/// Uses the supplied table when given, otherwise the cache (current or
/// historical per `date`). Never fails: a missing rate or provider error
/// retries against the static default table and flags the result
/// `used_fallback`.
pub async fn convert_currency(
    cache: &ExchangeRateCache,
    amount: f64,
    from: Currency,
    to: Currency,
    rates: Option<&RateTable>,
    date: Option<NaiveDate>,
) -> Conversion {
    let (table, used_fallback) = match rates {
        Some(table) => (table.clone(), false),
        None => cache.rates_or_default(date).await,
    };

    match convert_with_table(amount, from, to, &table, date, used_fallback) {
        Ok(conversion) => conversion,
        Err(e) => {
            warn!(error = %e, "converting against the static default table");
            convert_with_table(amount, from, to, &default_rates(), date, true)
                .expect("default table covers every supported currency")
        }
    }
}

/// Triangulate `amount` through MAD using `table`.
fn convert_with_table(
    amount: f64,
    from: Currency,
    to: Currency,
    table: &RateTable,
    date: Option<NaiveDate>,
    used_fallback: bool,
) -> Result<Conversion, RateError> {
    let conversion_date = date.unwrap_or_else(|| Utc::now().date_naive());
    let is_historical = date.is_some();

    if from == to {
        return Ok(Conversion {
            amount,
            converted_amount: amount,
            from,
            to,
            rate: 1.0,
            date: conversion_date,
            is_historical,
            used_fallback,
            formatted_original: format_currency(amount, from),
            formatted_converted: format_currency(amount, to),
        });
    }

    let from_rate = table
        .get(&from)
        .copied()
        .ok_or(RateError::MissingRate(from))?;
    let to_rate = table.get(&to).copied().ok_or(RateError::MissingRate(to))?;

    let amount_in_mad = if from == Currency::MAD {
        amount
    } else {
        amount / from_rate
    };
    let converted = if to == Currency::MAD {
        amount_in_mad
    } else {
        amount_in_mad * to_rate
    };

    let rate = if to == Currency::MAD {
        1.0 / from_rate
    } else if from == Currency::MAD {
        to_rate
    } else {
        to_rate / from_rate
    };

    let converted_amount = round4(converted);

    Ok(Conversion {
        amount,
        converted_amount,
        from,
        to,
        rate,
        date: conversion_date,
        is_historical,
        used_fallback,
        formatted_original: format_currency(amount, from),
        formatted_converted: format_currency(converted_amount, to),
    })
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Format an amount with the currency's locale conventions: symbol
/// placement, grouping, and decimal separator. Yen amounts round to whole
/// units.
pub fn format_currency(amount: f64, currency: Currency) -> String {
    match currency {
        Currency::MAD => format!("{} د.م.", french_number(amount)),
        Currency::USD => format!("${}", english_number(amount)),
        Currency::EUR => format!("{} €", french_number(amount)),
        Currency::GBP => format!("£{}", english_number(amount)),
        Currency::CAD => format!("C${}", english_number(amount)),
        Currency::CHF => format!("{} Fr", swiss_number(amount)),
        Currency::JPY => format!("¥{}", grouped_integer(amount.round(), ",")),
        Currency::CNY => format!("¥{}", english_number(amount)),
        Currency::AED => format!("{} د.إ", english_number(amount)),
        Currency::SAR => format!("{} ر.س", english_number(amount)),
    }
}

/// Format against a raw code string; codes outside the catalog fall back
/// to a plain `<amount> <code>` rendering.
pub fn format_currency_code(amount: f64, code: &str) -> String {
    match Currency::from_code(code) {
        Some(currency) => format_currency(amount, currency),
        None => format!("{} {}", english_number(amount), code),
    }
}

/// 1,234.56
fn english_number(amount: f64) -> String {
    decimal_number(amount, ",", ".")
}

/// 1 234,56
fn french_number(amount: f64) -> String {
    decimal_number(amount, " ", ",")
}

/// 1'234.56
fn swiss_number(amount: f64) -> String {
    decimal_number(amount, "'", ".")
}

fn decimal_number(amount: f64, group_sep: &str, decimal_sep: &str) -> String {
    let rounded = (amount * 100.0).round() / 100.0;
    let negative = rounded < 0.0;
    let cents = (rounded.abs() * 100.0).round() as u64;

    let integer = grouped_integer((cents / 100) as f64, group_sep);
    let fraction = cents % 100;

    let sign = if negative { "-" } else { "" };
    format!("{sign}{integer}{decimal_sep}{fraction:02}")
}

fn grouped_integer(value: f64, group_sep: &str) -> String {
    let digits = format!("{}", value.abs() as u64);
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push_str(group_sep);
        }
        grouped.push(c);
    }

    if value < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::rates::{RateProvider, SimulatedRateProvider};
    use crate::error::RateError;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    fn cache() -> ExchangeRateCache {
        ExchangeRateCache::new(Box::new(SimulatedRateProvider))
    }

    struct FailingProvider;

    #[async_trait]
    impl RateProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        async fn fetch(
            &self,
            _base: Currency,
            _date: Option<chrono::NaiveDate>,
        ) -> Result<RateTable, RateError> {
            Err(RateError::Provider("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn test_same_currency_is_identity() {
        let cache = cache();
        for amount in [0.0, 1.0, 1234.56] {
            let result = convert_currency(
                &cache,
                amount,
                Currency::MAD,
                Currency::MAD,
                None,
                None,
            )
            .await;
            assert_eq!(result.converted_amount, amount);
            assert_eq!(result.rate, 1.0);
            assert!(!result.used_fallback);
        }
    }

    #[tokio::test]
    async fn test_mad_to_foreign_uses_direct_rate() {
        let result =
            convert_currency(&cache(), 1000.0, Currency::MAD, Currency::USD, None, None).await;
        assert_eq!(result.rate, 0.1003);
        assert_eq!(result.converted_amount, 100.3);
    }

    #[tokio::test]
    async fn test_foreign_to_mad_inverts_rate() {
        let result =
            convert_currency(&cache(), 100.0, Currency::USD, Currency::MAD, None, None).await;
        // 100 / 0.1003, rounded to 4 decimals.
        assert_eq!(result.converted_amount, 997.0090);
        assert!((result.rate - 1.0 / 0.1003).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_cross_rate_triangulates_through_mad() {
        let result =
            convert_currency(&cache(), 100.0, Currency::USD, Currency::EUR, None, None).await;
        let expected = round4(100.0 / 0.1003 * 0.0921);
        assert_eq!(result.converted_amount, expected);
        assert!((result.rate - 0.0921 / 0.1003).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_supplied_table_wins() {
        let mut table = default_rates();
        table.insert(Currency::USD, 0.1);

        let result = convert_currency(
            &cache(),
            50.0,
            Currency::USD,
            Currency::MAD,
            Some(&table),
            None,
        )
        .await;
        assert_eq!(result.converted_amount, 500.0);
    }

    #[tokio::test]
    async fn test_incomplete_table_falls_back_to_defaults() {
        let mut table = RateTable::new();
        table.insert(Currency::MAD, 1.0);

        let result = convert_currency(
            &cache(),
            100.0,
            Currency::USD,
            Currency::MAD,
            Some(&table),
            None,
        )
        .await;
        assert!(result.used_fallback);
        assert_eq!(result.converted_amount, 997.0090);
    }

    #[tokio::test]
    async fn test_provider_failure_falls_back_to_defaults() {
        let cache = ExchangeRateCache::new(Box::new(FailingProvider));

        let result =
            convert_currency(&cache, 100.0, Currency::USD, Currency::MAD, None, None).await;
        assert!(result.used_fallback);
        // Same value a conversion against the static table produces.
        assert_eq!(result.converted_amount, 997.0090);
    }

    #[test]
    fn test_format_currency_locales() {
        assert_eq!(format_currency(1234.56, Currency::MAD), "1 234,56 د.م.");
        assert_eq!(format_currency(1234.56, Currency::USD), "$1,234.56");
        assert_eq!(format_currency(1234.56, Currency::EUR), "1 234,56 €");
        assert_eq!(format_currency(1234.56, Currency::GBP), "£1,234.56");
        assert_eq!(format_currency(1234.56, Currency::CHF), "1'234.56 Fr");
        assert_eq!(format_currency(1234.56, Currency::JPY), "¥1,235");
    }

    #[test]
    fn test_format_unknown_code_falls_back() {
        assert_eq!(format_currency_code(1234.5, "XYZ"), "1,234.50 XYZ");
        assert_eq!(format_currency_code(10.0, "usd"), "$10.00");
    }

    #[test]
    fn test_round4() {
        assert_eq!(round4(1.23456789), 1.2346);
        assert_eq!(round4(99.999949), 99.9999);
        assert_eq!(round4(0.00001), 0.0);
    }
}
