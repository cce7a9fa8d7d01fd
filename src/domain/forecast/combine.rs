//! Forecast combination with diversification correction.
//!
//! combined = cap((0.6 * mean(trend) + 0.4 * mean(carry)) * FDM[rule count])

use super::{cap_forecast, mean};
use crate::domain::error::CarrytrendError;

pub const TREND_WEIGHT: f64 = 0.6;
pub const CARRY_WEIGHT: f64 = 0.4;

pub const MIN_RULE_COUNT: usize = 1;
pub const MAX_RULE_COUNT: usize = 9;

/// Forecast diversification multiplier indexed by rule count - 1.
pub const FDM_BY_RULE_COUNT: [f64; MAX_RULE_COUNT] =
    [1.0, 1.02, 1.03, 1.23, 1.25, 1.27, 1.29, 1.32, 1.34];

pub fn forecast_diversification_multiplier(rule_count: usize) -> Result<f64, CarrytrendError> {
    if !(MIN_RULE_COUNT..=MAX_RULE_COUNT).contains(&rule_count) {
        return Err(CarrytrendError::RuleCountOutOfRange {
            count: rule_count,
            min: MIN_RULE_COUNT,
            max: MAX_RULE_COUNT,
        });
    }
    Ok(FDM_BY_RULE_COUNT[rule_count - 1])
}

/// Combined capped forecast, or `None` when either rule family produced nothing.
pub fn combine_forecasts(
    trend: &[f64],
    carry: &[f64],
    cap: f64,
) -> Result<Option<f64>, CarrytrendError> {
    if trend.is_empty() || carry.is_empty() {
        return Ok(None);
    }
    let raw = TREND_WEIGHT * mean(trend) + CARRY_WEIGHT * mean(carry);
    let fdm = forecast_diversification_multiplier(trend.len() + carry.len())?;
    Ok(Some(cap_forecast(raw * fdm, cap)))
}
