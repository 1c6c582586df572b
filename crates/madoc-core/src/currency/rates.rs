//! Exchange rate provider interface and process-wide snapshot cache.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::error::RateError;
use crate::models::analysis::ExchangeRateSnapshot;

use super::catalog::{default_rates, Currency, RateTable};

/// Source of exchange rate tables for a base currency.
///
/// Implementations may be slow or networked; results are cached by
/// [`ExchangeRateCache`]. A historical date pins the table to that day.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Short provider name recorded on snapshots.
    fn name(&self) -> &str;

    /// Fetch the rate table for `base`, optionally pinned to a date.
    async fn fetch(&self, base: Currency, date: Option<NaiveDate>)
        -> Result<RateTable, RateError>;
}

/// Deterministic stand-in for a real FX history source.
///
/// Current rates are the static default table; historical rates perturb it
/// by a day-of-month-derived factor within ±3%, so a given date always
/// yields the same table. Swap in a real provider without touching the
/// cache or converter.
pub struct SimulatedRateProvider;

#[async_trait]
impl RateProvider for SimulatedRateProvider {
    fn name(&self) -> &str {
        "simulation"
    }

    async fn fetch(
        &self,
        base: Currency,
        date: Option<NaiveDate>,
    ) -> Result<RateTable, RateError> {
        let mut rates = default_rates();

        if let Some(date) = date {
            let day_factor = f64::from(date.day()) / 31.0;
            let variation = 1.0 + (day_factor * 0.06 - 0.03);
            for (currency, rate) in rates.iter_mut() {
                if *currency != base {
                    *rate *= variation;
                }
            }
        }

        Ok(rates)
    }
}

struct CacheState {
    current: Option<ExchangeRateSnapshot>,
    historical: HashMap<NaiveDate, ExchangeRateSnapshot>,
}

/// Cache of current and historical rate snapshots.
///
/// One current snapshot with a TTL (6 hours by default) plus an unbounded
/// map of historical snapshots that persist for the process lifetime.
/// Explicitly constructed and injectable so tests can supply isolated
/// instances; the interior lock is never held across a provider call, so
/// concurrent misses may fetch redundantly — an accepted race.
pub struct ExchangeRateCache {
    provider: Box<dyn RateProvider>,
    ttl_ms: i64,
    state: Mutex<CacheState>,
}

impl ExchangeRateCache {
    /// Six hours.
    pub const DEFAULT_TTL_MS: u64 = 6 * 60 * 60 * 1000;

    /// Create a cache over the given provider with the default TTL.
    pub fn new(provider: Box<dyn RateProvider>) -> Self {
        Self::with_ttl(provider, Self::DEFAULT_TTL_MS)
    }

    /// Create a cache with an explicit current-snapshot TTL.
    pub fn with_ttl(provider: Box<dyn RateProvider>, ttl_ms: u64) -> Self {
        Self {
            provider,
            ttl_ms: ttl_ms as i64,
            state: Mutex::new(CacheState {
                current: None,
                historical: HashMap::new(),
            }),
        }
    }

    /// Get the snapshot for MAD, fetching through the provider on a miss.
    pub async fn snapshot(
        &self,
        date: Option<NaiveDate>,
    ) -> Result<ExchangeRateSnapshot, RateError> {
        if let Some(hit) = self.lookup(date) {
            debug!(historical = date.is_some(), "using cached exchange rates");
            return Ok(hit);
        }

        info!(
            historical = date.is_some(),
            "fetching exchange rates from provider"
        );
        let rates = self.provider.fetch(Currency::MAD, date).await?;

        let snapshot = ExchangeRateSnapshot {
            base: Currency::MAD,
            rates,
            fetched_at: Utc::now(),
            source: self.provider.name().to_string(),
            is_historical: date.is_some(),
        };

        self.store(date, snapshot.clone());
        Ok(snapshot)
    }

    /// Get the rate table for MAD, falling back to the static defaults when
    /// the provider fails. The second return value reports the fallback.
    pub async fn rates_or_default(&self, date: Option<NaiveDate>) -> (RateTable, bool) {
        match self.snapshot(date).await {
            Ok(snapshot) => (snapshot.rates, false),
            Err(e) => {
                warn!(error = %e, "rate fetch failed, using static default table");
                (default_rates(), true)
            }
        }
    }

    fn lookup(&self, date: Option<NaiveDate>) -> Option<ExchangeRateSnapshot> {
        let state = self.state.lock().expect("rate cache lock poisoned");

        match date {
            Some(date) => state.historical.get(&date).cloned(),
            None => state.current.as_ref().and_then(|snapshot| {
                let age_ms = Utc::now()
                    .signed_duration_since(snapshot.fetched_at)
                    .num_milliseconds();
                (age_ms < self.ttl_ms).then(|| snapshot.clone())
            }),
        }
    }

    fn store(&self, date: Option<NaiveDate>, snapshot: ExchangeRateSnapshot) {
        let mut state = self.state.lock().expect("rate cache lock poisoned");
        match date {
            Some(date) => {
                state.historical.insert(date, snapshot);
            }
            None => state.current = Some(snapshot),
        }
    }

    /// Drop the current snapshot, forcing the next request to refetch.
    pub fn invalidate(&self) {
        let mut state = self.state.lock().expect("rate cache lock poisoned");
        state.current = None;
    }
}
