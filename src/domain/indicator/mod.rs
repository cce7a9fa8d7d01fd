//! Exponential smoothing primitives used by the forecast rules.
//!
//! - [`ema`]: streaming EMA and the EWMAC (fast minus slow EMA) crossover
//! - [`ewm`]: exponentially weighted mean / standard deviation over a series

pub mod ema;
pub mod ewm;

/// Smoothing factor for a span: 2/(span+1).
pub fn span_alpha(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}
