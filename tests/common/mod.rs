#![allow(dead_code)]

use carrytrend::domain::error::CarrytrendError;
use carrytrend::domain::instrument::{
    Classification, ContractOffset, Instrument, InstrumentRegistry,
};
pub use carrytrend::domain::market_data::{ContractQuote, DailyUpdate};
use carrytrend::ports::data_port::MarketDataPort;
use chrono::{Duration, NaiveDate};
use std::collections::HashMap;

pub struct MockMarketDataPort {
    pub data: HashMap<String, Vec<DailyUpdate>>,
    pub errors: HashMap<String, String>,
}

impl MockMarketDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_updates(mut self, symbol: &str, updates: Vec<DailyUpdate>) -> Self {
        self.data.insert(symbol.to_string(), updates);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl MarketDataPort for MockMarketDataPort {
    fn fetch_daily(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<DailyUpdate>, CarrytrendError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(CarrytrendError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|u| u.date >= start_date && u.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_instruments(&self) -> Result<Vec<String>, CarrytrendError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 1, 3).unwrap()
}

pub fn near_expiry() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 3, 15).unwrap()
}

pub fn further_expiry() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 6, 15).unwrap()
}

/// Prices rising by `step` per day with a +/- `wiggle` alternation so
/// volatility never collapses to zero.
pub fn trending_prices(count: usize, base: f64, step: f64, wiggle: f64) -> Vec<f64> {
    (0..count)
        .map(|i| {
            let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
            base + step * i as f64 + sign * wiggle
        })
        .collect()
}

/// Daily updates on consecutive calendar days. The further contract trades
/// at `near * (1 + further_premium)`.
pub fn make_updates(symbol: &str, prices: &[f64], further_premium: f64) -> Vec<DailyUpdate> {
    prices
        .iter()
        .enumerate()
        .map(|(i, &price)| DailyUpdate {
            symbol: symbol.to_string(),
            date: start_date() + Duration::days(i as i64),
            adjusted_price: price,
            near: ContractQuote {
                contract: format!("{symbol}H30"),
                price,
                expiry: near_expiry(),
            },
            further: ContractQuote {
                contract: format!("{symbol}M30"),
                price: price * (1.0 + further_premium),
                expiry: further_expiry(),
            },
        })
        .collect()
}

pub fn make_instrument(symbol: &str, sector: &str, group: &str, multiplier: f64) -> Instrument {
    Instrument {
        symbol: symbol.to_string(),
        classification: Classification::new(sector, group),
        contract_offset: ContractOffset::Near,
        multiplier,
    }
}

pub fn make_registry(instruments: Vec<Instrument>) -> InstrumentRegistry {
    instruments.into_iter().collect()
}
