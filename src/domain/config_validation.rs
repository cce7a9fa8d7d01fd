//! Configuration validation.
//!
//! Validates every config field before any history is replayed, including
//! the static check that the configured spans fit the diversification table.

use crate::domain::error::CarrytrendError;
use crate::domain::forecast::combine::{MAX_RULE_COUNT, MIN_RULE_COUNT};
use crate::domain::forecast::trend::trend_forecast_scalar;
use crate::domain::strategy::{StrategyConfig, DEFAULT_CARRY_SPANS};
use crate::ports::config_port::ConfigPort;
use chrono::{NaiveDate, NaiveTime};
use std::collections::HashSet;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M:%S";

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), CarrytrendError> {
    validate_strategy_config(config)?;
    validate_portfolio_config(config)?;
    validate_universe_config(config)?;
    validate_run_config(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), CarrytrendError> {
    let defaults = StrategyConfig::default();

    let emac_filters = config.get_int("strategy", "emac_filters", defaults.emac_filters as i64);
    let min_exponent =
        config.get_int("strategy", "emac_min_exponent", defaults.emac_min_exponent as i64);
    if min_exponent < 1 {
        return Err(invalid(
            "strategy",
            "emac_min_exponent",
            "emac_min_exponent must be at least 1",
        ));
    }
    if emac_filters < min_exponent {
        return Err(invalid(
            "strategy",
            "emac_filters",
            "emac_filters must be at least emac_min_exponent",
        ));
    }
    if emac_filters >= usize::BITS as i64 {
        return Err(invalid("strategy", "emac_filters", "emac_filters is too large"));
    }
    for exponent in min_exponent..=emac_filters {
        trend_forecast_scalar(1usize << exponent).map_err(|e| {
            invalid("strategy", "emac_filters", &e.to_string())
        })?;
    }

    let carry_spans = parse_carry_spans(config)?;

    let rule_count = (emac_filters - min_exponent + 1) as usize + carry_spans.len();
    if !(MIN_RULE_COUNT..=MAX_RULE_COUNT).contains(&rule_count) {
        return Err(invalid(
            "strategy",
            "carry_spans",
            &format!(
                "trend and carry spans give {} rules, must be between {} and {}",
                rule_count, MIN_RULE_COUNT, MAX_RULE_COUNT
            ),
        ));
    }

    positive(config, "strategy", "abs_forecast_cap", defaults.abs_forecast_cap)?;
    positive(config, "strategy", "idm", defaults.idm)?;

    let sigma_span = config.get_int("strategy", "sigma_span", defaults.sigma_span as i64);
    if sigma_span < 2 {
        return Err(invalid("strategy", "sigma_span", "sigma_span must be at least 2"));
    }

    let blend_years = config.get_int("strategy", "blend_years", defaults.blend_years as i64);
    if blend_years < 0 {
        return Err(invalid("strategy", "blend_years", "blend_years must be non-negative"));
    }

    let weight = config.get_double("strategy", "long_run_vol_weight", defaults.long_run_vol_weight);
    if !(0.0..=1.0).contains(&weight) {
        return Err(invalid(
            "strategy",
            "long_run_vol_weight",
            "long_run_vol_weight must be between 0 and 1",
        ));
    }

    let target_risk = config.get_double("strategy", "target_risk", defaults.target_risk);
    if target_risk <= 0.0 || target_risk > 1.0 {
        return Err(invalid("strategy", "target_risk", "target_risk must be between 0 and 1"));
    }
    Ok(())
}

/// Carry smoothing spans; the default list when the key is absent.
pub fn parse_carry_spans(config: &dyn ConfigPort) -> Result<Vec<usize>, CarrytrendError> {
    let Some(raw) = config.get_list("strategy", "carry_spans") else {
        return Ok(DEFAULT_CARRY_SPANS.to_vec());
    };
    if raw.is_empty() {
        return Err(invalid("strategy", "carry_spans", "carry_spans must not be empty"));
    }
    raw.iter()
        .map(|s| match s.parse::<usize>() {
            Ok(span) if span > 0 => Ok(span),
            _ => Err(invalid(
                "strategy",
                "carry_spans",
                &format!("'{}' is not a positive integer", s),
            )),
        })
        .collect()
}

pub fn validate_portfolio_config(config: &dyn ConfigPort) -> Result<(), CarrytrendError> {
    if config.get_string("portfolio", "total_value").is_none() {
        return Err(missing("portfolio", "total_value"));
    }
    positive(config, "portfolio", "total_value", 0.0)
}

pub fn validate_universe_config(config: &dyn ConfigPort) -> Result<(), CarrytrendError> {
    let symbols = config
        .get_list("universe", "instruments")
        .filter(|s| !s.is_empty())
        .ok_or_else(|| missing("universe", "instruments"))?;

    let mut seen = HashSet::new();
    for symbol in &symbols {
        if !seen.insert(symbol.to_uppercase()) {
            return Err(invalid(
                "universe",
                "instruments",
                &format!("duplicate instrument {}", symbol),
            ));
        }
        validate_instrument(config, symbol)?;
    }
    Ok(())
}

fn validate_instrument(config: &dyn ConfigPort, symbol: &str) -> Result<(), CarrytrendError> {
    for key in ["sector", "group"] {
        match config.get_string(symbol, key) {
            Some(s) if !s.trim().is_empty() => {}
            _ => return Err(missing(symbol, key)),
        }
    }

    if config.get_string(symbol, "multiplier").is_none() {
        return Err(missing(symbol, "multiplier"));
    }
    positive(config, symbol, "multiplier", 0.0)?;

    let offset = config.get_int(symbol, "contract_offset", 0);
    if !(0..=1).contains(&offset) {
        return Err(invalid(symbol, "contract_offset", "contract_offset must be 0 or 1"));
    }
    Ok(())
}

pub fn validate_run_config(config: &dyn ConfigPort) -> Result<(), CarrytrendError> {
    parse_start_date(config)?;
    parse_market_open(config)?;
    Ok(())
}

pub fn parse_start_date(config: &dyn ConfigPort) -> Result<Option<NaiveDate>, CarrytrendError> {
    config
        .get_string("run", "start_date")
        .map(|s| {
            NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| {
                invalid("run", "start_date", "invalid start_date format, expected YYYY-MM-DD")
            })
        })
        .transpose()
}

pub fn parse_market_open(config: &dyn ConfigPort) -> Result<NaiveTime, CarrytrendError> {
    match config.get_string("run", "market_open") {
        None => Ok(NaiveTime::MIN),
        Some(s) => NaiveTime::parse_from_str(s.trim(), TIME_FORMAT).map_err(|_| {
            invalid("run", "market_open", "invalid market_open format, expected HH:MM:SS")
        }),
    }
}

fn positive(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<(), CarrytrendError> {
    let value = config.get_double(section, key, default);
    if value <= 0.0 || !value.is_finite() {
        return Err(invalid(section, key, &format!("{} must be positive", key)));
    }
    Ok(())
}

fn missing(section: &str, key: &str) -> CarrytrendError {
    CarrytrendError::ConfigMissing {
        section: section.to_string(),
        key: key.to_string(),
    }
}

fn invalid(section: &str, key: &str, reason: &str) -> CarrytrendError {
    CarrytrendError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
