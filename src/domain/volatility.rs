//! Instrument volatility estimate.
//!
//! Daily percentage returns are the change in back-adjusted price divided by
//! the previous raw close of the mapped contract, on dates where both exist.
//! Their exponentially weighted standard deviation (span = `sigma_span`,
//! min periods = `sigma_span`) is annualized, then blended with the average
//! of the whole annualized series over the lookback window.

use super::indicator::ewm::ewm_std_series;
use super::time_series::TimeSeries;

pub const BUSINESS_DAYS_IN_YEAR: f64 = 256.0;

/// sqrt(256) = 16.
pub fn annualization_factor() -> f64 {
    BUSINESS_DAYS_IN_YEAR.sqrt()
}

/// Daily % returns over the dates present in both series.
pub fn pct_returns(raw: &TimeSeries, adjusted: &TimeSeries) -> Vec<f64> {
    let aligned: Vec<(f64, f64)> = adjusted
        .points()
        .iter()
        .filter_map(|p| raw.get(p.date).map(|r| (p.value, r)))
        .collect();

    aligned
        .windows(2)
        .map(|w| {
            let (prev_adjusted, prev_raw) = w[0];
            let (adjusted, _) = w[1];
            (adjusted - prev_adjusted) / prev_raw
        })
        .collect()
}

/// Blended annualized standard deviation of % returns.
///
/// Returns `None` when fewer than `sigma_span` returns exist or the result is
/// not a strictly positive finite number.
pub fn estimate_sigma_pct(
    raw: &TimeSeries,
    adjusted: &TimeSeries,
    sigma_span: usize,
    long_run_weight: f64,
) -> Option<f64> {
    let returns = pct_returns(raw, adjusted);
    if returns.iter().any(|r| !r.is_finite()) {
        return None;
    }

    let annualized: Vec<f64> = ewm_std_series(&returns, sigma_span, sigma_span)
        .into_iter()
        .map(|s| s * annualization_factor())
        .collect();
    let recent = *annualized.last()?;
    let long_run = annualized.iter().sum::<f64>() / annualized.len() as f64;

    let blended = long_run_weight * long_run + (1.0 - long_run_weight) * recent;
    (blended.is_finite() && blended > 0.0).then_some(blended)
}

/// Monetary size of a one standard deviation daily move in one unit of price.
pub fn daily_risk_price_terms(sigma_pct: f64, contract_price: f64) -> f64 {
    sigma_pct / annualization_factor() * contract_price
}
