//! Forecast rules and their combination.
//!
//! Forecasts are unit-free, scaled so the average absolute value is about 10,
//! and capped to `[-cap, +cap]` after every scaling step.

pub mod trend;
pub mod carry;
pub mod combine;

/// Clamp a forecast to `[-cap, +cap]`.
pub fn cap_forecast(value: f64, cap: f64) -> f64 {
    value.min(cap).max(-cap)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn cap_inside_range_is_identity() {
        assert_eq!(cap_forecast(12.5, 20.0), 12.5);
        assert_eq!(cap_forecast(-3.0, 20.0), -3.0);
    }

    #[test]
    fn cap_clamps_both_sides() {
        assert_eq!(cap_forecast(45.0, 20.0), 20.0);
        assert_eq!(cap_forecast(-45.0, 20.0), -20.0);
    }

    proptest! {
        #[test]
        fn capped_magnitude_never_exceeds_cap(
            value in -1.0e6..1.0e6_f64,
            cap in 0.1..100.0_f64,
        ) {
            prop_assert!(cap_forecast(value, cap).abs() <= cap);
        }
    }
}
