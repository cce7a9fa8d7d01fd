//! Rolling per-instrument price history.
//!
//! The buffer owns every series the signal rules read: the mapped contract's
//! raw close, the back-adjusted continuous price, annualized raw carry, and
//! the streaming EWMAC indicators. Per-contract raw closes are kept
//! separately with only the latest point retained.

use chrono::{Duration, NaiveDate};
use std::collections::HashMap;

use super::indicator::ema::Ewmac;
use super::market_data::DailyUpdate;
use super::time_series::TimeSeries;

const DAYS_PER_MONTH: f64 = 30.0;
const MONTHS_PER_YEAR: f64 = 12.0;

#[derive(Debug, Clone)]
pub struct InstrumentHistory {
    pub raw: TimeSeries,
    pub adjusted: TimeSeries,
    pub carry: TimeSeries,
    ewmacs: Vec<Ewmac>,
}

impl InstrumentHistory {
    fn new(fast_spans: &[usize]) -> Self {
        Self {
            raw: TimeSeries::new(),
            adjusted: TimeSeries::new(),
            carry: TimeSeries::new(),
            ewmacs: fast_spans.iter().map(|&span| Ewmac::new(span)).collect(),
        }
    }

    /// (fast span, EWMAC) for every configured span with a value.
    pub fn ewmac_values(&self) -> Vec<(usize, f64)> {
        self.ewmacs
            .iter()
            .filter_map(|e| e.value().map(|v| (e.fast_span(), v)))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    lookback: Duration,
    fast_spans: Vec<usize>,
    instruments: HashMap<String, InstrumentHistory>,
    contracts: HashMap<String, TimeSeries>,
}

impl HistoryBuffer {
    pub fn new(lookback_days: i64, fast_spans: Vec<usize>) -> Self {
        Self {
            lookback: Duration::days(lookback_days),
            fast_spans,
            instruments: HashMap::new(),
            contracts: HashMap::new(),
        }
    }

    pub fn lookback_days(&self) -> i64 {
        self.lookback.num_days()
    }

    /// Append raw and adjusted closes, then prune points older than the window.
    /// A date older than the latest adjusted point is ignored.
    pub fn update(&mut self, symbol: &str, date: NaiveDate, raw_price: f64, adjusted_price: f64) {
        let cutoff = date - self.lookback;
        let fast_spans = &self.fast_spans;
        let history = self
            .instruments
            .entry(symbol.to_string())
            .or_insert_with(|| InstrumentHistory::new(fast_spans));

        let is_new_date = match history.adjusted.last() {
            Some(last) if last.date > date => return,
            Some(last) => last.date < date,
            None => true,
        };

        history.raw.upsert(date, raw_price);
        history.adjusted.upsert(date, adjusted_price);
        if is_new_date {
            history
                .ewmacs
                .iter_mut()
                .for_each(|e| e.update(adjusted_price));
        }
        history.raw.prune_before(cutoff);
        history.adjusted.prune_before(cutoff);
    }

    /// Append the annualized carry between two contracts and prune like [`update`](Self::update).
    /// Contracts expiring in the same rounded month produce no point.
    pub fn update_carry(
        &mut self,
        symbol: &str,
        date: NaiveDate,
        near_price: f64,
        further_price: f64,
        near_expiry: NaiveDate,
        further_expiry: NaiveDate,
    ) {
        let Some(carry) = annualized_carry(near_price, further_price, near_expiry, further_expiry)
        else {
            tracing::debug!(symbol, %near_expiry, %further_expiry, "contracts too close for carry");
            return;
        };
        let cutoff = date - self.lookback;
        let fast_spans = &self.fast_spans;
        let history = self
            .instruments
            .entry(symbol.to_string())
            .or_insert_with(|| InstrumentHistory::new(fast_spans));
        if history.carry.upsert(date, carry) {
            history.carry.prune_before(cutoff);
        }
    }

    /// Keep only the latest raw close of a dated contract.
    pub fn record_contract_close(&mut self, contract: &str, date: NaiveDate, price: f64) {
        let series = self.contracts.entry(contract.to_string()).or_default();
        series.upsert(date, price);
        series.retain_last(1);
    }

    pub fn contract_close(&self, contract: &str) -> Option<f64> {
        self.contracts
            .get(contract)
            .and_then(|s| s.last())
            .map(|p| p.value)
    }

    pub fn contract_history(&self, contract: &str) -> Option<&TimeSeries> {
        self.contracts.get(contract)
    }

    /// Apply one daily bar: contract closes, mapped raw/adjusted closes, carry.
    pub fn ingest(&mut self, update: &DailyUpdate) {
        self.record_contract_close(&update.near.contract, update.date, update.near.price);
        self.record_contract_close(&update.further.contract, update.date, update.further.price);
        self.update(
            &update.symbol,
            update.date,
            update.near.price,
            update.adjusted_price,
        );

        let near = self.contract_close(&update.near.contract);
        let further = self.contract_close(&update.further.contract);
        if let (Some(near_price), Some(further_price)) = (near, further) {
            self.update_carry(
                &update.symbol,
                update.date,
                near_price,
                further_price,
                update.near.expiry,
                update.further.expiry,
            );
        }
    }

    pub fn get(&self, symbol: &str) -> Option<&InstrumentHistory> {
        self.instruments.get(symbol)
    }

    pub fn remove(&mut self, symbol: &str) -> Option<InstrumentHistory> {
        self.instruments.remove(symbol)
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}

/// Whole months between two expiries: day difference / 30, rounded half to even.
pub fn months_between(near_expiry: NaiveDate, further_expiry: NaiveDate) -> i64 {
    let days = (further_expiry - near_expiry).num_days() as f64;
    (days / DAYS_PER_MONTH).round_ties_even() as i64
}

/// (near - further) / |months between expiries| / 12.
pub fn annualized_carry(
    near_price: f64,
    further_price: f64,
    near_expiry: NaiveDate,
    further_expiry: NaiveDate,
) -> Option<f64> {
    let months = months_between(near_expiry, further_expiry);
    if months == 0 {
        return None;
    }
    let years = months.unsigned_abs() as f64 / MONTHS_PER_YEAR;
    Some((near_price - further_price) / years)
}
