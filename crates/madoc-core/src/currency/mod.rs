//! Multi-currency detection, exchange rates, and conversion.

pub mod catalog;
pub mod convert;
pub mod detect;
pub mod rates;

pub use catalog::{default_rates, Currency, RateTable, CURRENCY_CATALOG};
pub use convert::{convert_currency, format_currency, format_currency_code};
pub use detect::CurrencyDetector;
pub use rates::{ExchangeRateCache, RateProvider, SimulatedRateProvider};
