//! Daily signal pass.
//!
//! [`SignalEngine`] owns the history buffer and runs the per-instrument
//! pipeline: volatility, trend and carry forecasts, combination, sizing.
//! Instruments are independent apart from the shared portfolio value and the
//! capital weights, which are allocated across every instrument that has a
//! volatility estimate on the day.

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::fmt;

use super::allocation::allocate_weights;
use super::error::CarrytrendError;
use super::forecast::carry::carry_forecasts;
use super::forecast::combine::combine_forecasts;
use super::forecast::trend::trend_forecasts;
use super::history::HistoryBuffer;
use super::instrument::{Instrument, InstrumentRegistry};
use super::market_data::DailyUpdate;
use super::sizing::{direction, position_size, Direction, SizingInputs};
use super::strategy::StrategyConfig;
use super::volatility::{daily_risk_price_terms, estimate_sigma_pct};

#[derive(Debug, Clone, PartialEq)]
pub struct TargetSignal {
    pub date: NaiveDate,
    pub symbol: String,
    pub contract: String,
    pub forecast: f64,
    pub quantity: f64,
    pub direction: Direction,
    pub valid_until: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoHistory,
    InsufficientHistory,
    NonPositiveRisk,
    NoTrendForecast,
    NoCarryForecast,
    ZeroSignal,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::NoHistory => "no history",
            SkipReason::InsufficientHistory => "insufficient history",
            SkipReason::NonPositiveRisk => "non-positive risk",
            SkipReason::NoTrendForecast => "no trend forecast",
            SkipReason::NoCarryForecast => "no carry forecast",
            SkipReason::ZeroSignal => "zero signal",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedInstrument {
    pub symbol: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PassReport {
    pub date: NaiveDate,
    pub signals: Vec<TargetSignal>,
    pub skipped: Vec<SkippedInstrument>,
}

/// Result of running the pipeline for one instrument.
enum Outcome {
    Signal(TargetSignal),
    Skipped(SkipReason),
}

#[derive(Debug, Clone)]
pub struct SignalEngine {
    config: StrategyConfig,
    history: HistoryBuffer,
    latest: HashMap<String, DailyUpdate>,
    last_processed: Option<NaiveDate>,
}

impl SignalEngine {
    pub fn new(config: StrategyConfig) -> Self {
        let history = HistoryBuffer::new(config.lookback_days(), config.fast_spans());
        Self {
            config,
            history,
            latest: HashMap::new(),
            last_processed: None,
        }
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn last_processed(&self) -> Option<NaiveDate> {
        self.last_processed
    }

    /// Feed one daily bar into the history buffer. A bar older than the
    /// latest one seen for its instrument is ignored.
    pub fn ingest(&mut self, update: &DailyUpdate) {
        if self
            .latest
            .get(&update.symbol)
            .is_some_and(|latest| latest.date > update.date)
        {
            tracing::debug!(symbol = %update.symbol, date = %update.date, "ignoring stale bar");
            return;
        }
        self.history.ingest(update);
        self.latest.insert(update.symbol.clone(), update.clone());
    }

    /// Forget an instrument that left the universe.
    pub fn remove(&mut self, symbol: &str) {
        self.history.remove(symbol);
        self.latest.remove(symbol);
    }

    /// Run the pipeline for every registered instrument.
    ///
    /// Returns `Ok(None)` when `date` was already processed. A rule count
    /// outside the diversification table aborts the pass.
    pub fn run_pass(
        &mut self,
        date: NaiveDate,
        registry: &InstrumentRegistry,
        portfolio_value: f64,
        valid_until: NaiveDateTime,
    ) -> Result<Option<PassReport>, CarrytrendError> {
        if self.last_processed == Some(date) {
            tracing::debug!(%date, "pass already processed");
            return Ok(None);
        }

        let mut skipped = Vec::new();
        let mut sigmas: Vec<(&Instrument, f64)> = Vec::new();
        for instrument in registry.iter() {
            match self.sigma_for(&instrument.symbol) {
                Ok(sigma) => sigmas.push((instrument, sigma)),
                Err(reason) => skipped.push(skip(&instrument.symbol, reason)),
            }
        }

        let weights = allocate_weights(
            sigmas
                .iter()
                .map(|(i, _)| (i.symbol.as_str(), &i.classification)),
        );

        let mut signals = Vec::new();
        for (instrument, sigma) in sigmas {
            let weight = weights.get(&instrument.symbol).copied().unwrap_or(0.0);
            let outcome = self.instrument_signal(
                instrument,
                sigma,
                weight,
                portfolio_value,
                date,
                valid_until,
            )?;
            match outcome {
                Outcome::Signal(signal) => signals.push(signal),
                Outcome::Skipped(reason) => skipped.push(skip(&instrument.symbol, reason)),
            }
        }

        for s in &skipped {
            tracing::debug!(%date, symbol = %s.symbol, reason = %s.reason, "instrument skipped");
        }
        tracing::info!(
            %date,
            signals = signals.len(),
            skipped = skipped.len(),
            "signal pass complete"
        );

        self.last_processed = Some(date);
        Ok(Some(PassReport {
            date,
            signals,
            skipped,
        }))
    }

    fn sigma_for(&self, symbol: &str) -> Result<f64, SkipReason> {
        let history = self.history.get(symbol).ok_or(SkipReason::NoHistory)?;
        estimate_sigma_pct(
            &history.raw,
            &history.adjusted,
            self.config.sigma_span,
            self.config.long_run_vol_weight,
        )
        .ok_or(SkipReason::InsufficientHistory)
    }

    fn instrument_signal(
        &self,
        instrument: &Instrument,
        sigma_pct: f64,
        weight: f64,
        portfolio_value: f64,
        date: NaiveDate,
        valid_until: NaiveDateTime,
    ) -> Result<Outcome, CarrytrendError> {
        let (Some(history), Some(latest)) = (
            self.history.get(&instrument.symbol),
            self.latest.get(&instrument.symbol),
        ) else {
            return Ok(Outcome::Skipped(SkipReason::NoHistory));
        };
        let config = &self.config;
        let target = latest.contract(instrument.contract_offset);

        let risk = daily_risk_price_terms(sigma_pct, target.price);
        if risk.is_nan() || risk <= 0.0 {
            return Ok(Outcome::Skipped(SkipReason::NonPositiveRisk));
        }

        let quantity = position_size(&SizingInputs {
            portfolio_value,
            idm: config.idm,
            weight,
            target_risk: config.target_risk,
            multiplier: instrument.multiplier,
            daily_risk_price_terms: risk,
        });

        let trend = trend_forecasts(&history.ewmac_values(), risk, config.abs_forecast_cap)?;
        if trend.is_empty() {
            return Ok(Outcome::Skipped(SkipReason::NoTrendForecast));
        }
        let carry = carry_forecasts(
            &history.carry,
            risk,
            &config.carry_spans,
            config.abs_forecast_cap,
        );
        if carry.is_empty() {
            return Ok(Outcome::Skipped(SkipReason::NoCarryForecast));
        }

        let forecast = match combine_forecasts(&trend, &carry, config.abs_forecast_cap) {
            Ok(Some(f)) => f,
            Ok(None) => return Ok(Outcome::Skipped(SkipReason::NoTrendForecast)),
            Err(e) => {
                tracing::error!(symbol = %instrument.symbol, error = %e, "aborting signal pass");
                return Err(e);
            }
        };

        let Some(direction) = direction(forecast, quantity) else {
            return Ok(Outcome::Skipped(SkipReason::ZeroSignal));
        };

        Ok(Outcome::Signal(TargetSignal {
            date,
            symbol: instrument.symbol.clone(),
            contract: target.contract.clone(),
            forecast,
            quantity,
            direction,
            valid_until,
        }))
    }
}

fn skip(symbol: &str, reason: SkipReason) -> SkippedInstrument {
    SkippedInstrument {
        symbol: symbol.to_string(),
        reason,
    }
}
