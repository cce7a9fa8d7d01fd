//! Trend forecasts from EWMAC crossovers.
//!
//! forecast(f) = cap(EWMAC(f) / daily_risk_price_terms * scalar(f))

use super::cap_forecast;
use crate::domain::error::CarrytrendError;

/// Forecast scalar per fast span, chosen so the average absolute forecast is about 10.
pub const TREND_FORECAST_SCALARS: [(usize, f64); 6] = [
    (2, 12.1),
    (4, 8.53),
    (8, 5.95),
    (16, 4.1),
    (32, 2.79),
    (64, 1.91),
];

pub fn trend_forecast_scalar(fast_span: usize) -> Result<f64, CarrytrendError> {
    TREND_FORECAST_SCALARS
        .iter()
        .find(|(span, _)| *span == fast_span)
        .map(|(_, scalar)| *scalar)
        .ok_or(CarrytrendError::UnknownTrendSpan { span: fast_span })
}

/// One capped forecast per `(fast span, EWMAC)` pair, in input order.
/// `daily_risk_price_terms` must be strictly positive.
pub fn trend_forecasts(
    ewmac_by_span: &[(usize, f64)],
    daily_risk_price_terms: f64,
    cap: f64,
) -> Result<Vec<f64>, CarrytrendError> {
    ewmac_by_span
        .iter()
        .map(|&(span, ewmac)| {
            let scalar = trend_forecast_scalar(span)?;
            Ok(cap_forecast(ewmac / daily_risk_price_terms * scalar, cap))
        })
        .collect()
}
