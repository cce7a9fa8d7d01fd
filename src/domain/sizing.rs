//! Risk-targeted position sizing.
//!
//! contracts = (capital * idm * weight * target_risk)
//!           / (multiplier * daily_risk_price_terms * sqrt(256))

use super::volatility::annualization_factor;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizingInputs {
    pub portfolio_value: f64,
    pub idm: f64,
    pub weight: f64,
    pub target_risk: f64,
    pub multiplier: f64,
    pub daily_risk_price_terms: f64,
}

/// Unsigned contract count at average forecast strength.
pub fn position_size(inputs: &SizingInputs) -> f64 {
    (inputs.portfolio_value * inputs.idm * inputs.weight * inputs.target_risk)
        / (inputs.multiplier * inputs.daily_risk_price_terms * annualization_factor())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Direction of `forecast * quantity`, or `None` when the product is zero.
pub fn direction(forecast: f64, quantity: f64) -> Option<Direction> {
    let product = forecast * quantity;
    if product > 0.0 {
        Some(Direction::Up)
    } else if product < 0.0 {
        Some(Direction::Down)
    } else {
        None
    }
}
