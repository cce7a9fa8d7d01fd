//! Strategy parameters for the carry and trend signal engine.

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyConfig {
    /// Highest power-of-two exponent for the EWMAC fast spans.
    pub emac_filters: u32,
    /// Lowest power-of-two exponent for the EWMAC fast spans.
    pub emac_min_exponent: u32,
    pub carry_spans: Vec<usize>,
    pub abs_forecast_cap: f64,
    pub sigma_span: usize,
    pub blend_years: u32,
    /// Weight of the long-run average in the blended volatility estimate.
    pub long_run_vol_weight: f64,
    pub target_risk: f64,
    pub idm: f64,
}

pub const DEFAULT_CARRY_SPANS: [usize; 4] = [5, 20, 60, 120];

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            emac_filters: 6,
            emac_min_exponent: 4,
            carry_spans: DEFAULT_CARRY_SPANS.to_vec(),
            abs_forecast_cap: 20.0,
            sigma_span: 32,
            blend_years: 3,
            long_run_vol_weight: 0.5,
            target_risk: 0.2,
            idm: 1.5,
        }
    }
}

impl StrategyConfig {
    /// EWMAC fast spans: 2^x for x in `emac_min_exponent..=emac_filters`.
    pub fn fast_spans(&self) -> Vec<usize> {
        (self.emac_min_exponent..=self.emac_filters)
            .map(|x| 1usize << x)
            .collect()
    }

    /// Calendar days of history kept: ceil(sigma_span * 1.4 + blend_years * 365).
    pub fn lookback_days(&self) -> i64 {
        (self.sigma_span as f64 * 1.4 + self.blend_years as f64 * 365.0).ceil() as i64
    }

    /// Rule count when every trend and carry span produces a forecast.
    pub fn max_rule_count(&self) -> usize {
        self.fast_spans().len() + self.carry_spans.len()
    }
}
