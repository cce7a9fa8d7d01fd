//! Carry forecasts from smoothed, risk-adjusted annualized carry.

use super::cap_forecast;
use crate::domain::indicator::ewm::ewm_mean_last;
use crate::domain::time_series::TimeSeries;

pub const CARRY_FORECAST_SCALAR: f64 = 30.0;

/// One capped forecast per smoothing span that has at least `span` carry points.
///
/// The whole carry history is divided by today's `daily_risk_price_terms`,
/// smoothed with an exponential mean (min periods = span), and the final
/// value is scaled and capped. Spans without enough history are omitted.
pub fn carry_forecasts(
    annualized_carry: &TimeSeries,
    daily_risk_price_terms: f64,
    spans: &[usize],
    cap: f64,
) -> Vec<f64> {
    let risk_adjusted: Vec<f64> = annualized_carry
        .values()
        .map(|c| c / daily_risk_price_terms)
        .collect();

    spans
        .iter()
        .filter_map(|&span| ewm_mean_last(&risk_adjusted, span, span))
        .map(|smoothed| cap_forecast(smoothed * CARRY_FORECAST_SCALAR, cap))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, NaiveDate};

    fn carry_series(values: &[f64]) -> TimeSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut ts = TimeSeries::new();
        for (i, &v) in values.iter().enumerate() {
            ts.upsert(start + Duration::days(i as i64), v);
        }
        ts
    }

    #[test]
    fn constant_carry_scaled_by_thirty() {
        let ts = carry_series(&[0.1; 10]);
        let forecasts = carry_forecasts(&ts, 1.0, &[5], 20.0);
        assert_eq!(forecasts.len(), 1);
        assert_relative_eq!(forecasts[0], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn spans_without_history_are_omitted() {
        let ts = carry_series(&[0.1; 30]);
        let forecasts = carry_forecasts(&ts, 1.0, &[5, 20, 60, 120], 20.0);
        assert_eq!(forecasts.len(), 2);
    }

    #[test]
    fn too_little_history_for_every_span_is_empty() {
        let ts = carry_series(&[0.1; 4]);
        assert!(carry_forecasts(&ts, 1.0, &[5, 20, 60, 120], 20.0).is_empty());
    }

    #[test]
    fn empty_history_is_empty() {
        assert!(carry_forecasts(&TimeSeries::new(), 1.0, &[5], 20.0).is_empty());
    }

    #[test]
    fn carry_is_divided_by_risk() {
        let ts = carry_series(&[2.0; 5]);
        let forecasts = carry_forecasts(&ts, 10.0, &[5], 20.0);
        assert_relative_eq!(forecasts[0], 2.0 / 10.0 * 30.0, epsilon = 1e-12);
    }

    #[test]
    fn large_carry_is_capped() {
        let ts = carry_series(&[-50.0; 5]);
        let forecasts = carry_forecasts(&ts, 1.0, &[5], 20.0);
        assert_eq!(forecasts, vec![-20.0]);
    }
}
