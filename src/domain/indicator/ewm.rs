//! Exponentially weighted mean and standard deviation.
//!
//! Adjusted weighting: the i-th most recent observation carries weight
//! (1-a)^i, a = 2/(span+1). The standard deviation is bias corrected:
//! var = biased_var * W^2 / (W^2 - sum(w^2)).
//! Values are emitted only once `min_periods` observations have been seen.

use super::span_alpha;

#[derive(Debug, Clone)]
pub struct EwmAccumulator {
    decay: f64,
    count: usize,
    sum_w: f64,
    sum_w2: f64,
    sum_wx: f64,
    sum_wxx: f64,
}

impl EwmAccumulator {
    pub fn new(span: usize) -> Self {
        Self {
            decay: 1.0 - span_alpha(span.max(1)),
            count: 0,
            sum_w: 0.0,
            sum_w2: 0.0,
            sum_wx: 0.0,
            sum_wxx: 0.0,
        }
    }

    pub fn push(&mut self, x: f64) {
        let d = self.decay;
        self.sum_w = self.sum_w * d + 1.0;
        self.sum_w2 = self.sum_w2 * d * d + 1.0;
        self.sum_wx = self.sum_wx * d + x;
        self.sum_wxx = self.sum_wxx * d + x * x;
        self.count += 1;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum_wx / self.sum_w)
    }

    pub fn std(&self) -> Option<f64> {
        if self.count < 2 {
            return None;
        }
        let mean = self.sum_wx / self.sum_w;
        let biased = (self.sum_wxx / self.sum_w - mean * mean).max(0.0);
        let w2 = self.sum_w * self.sum_w;
        let denom = w2 - self.sum_w2;
        if denom <= 0.0 {
            return None;
        }
        Some((biased * w2 / denom).sqrt())
    }
}

/// Final exponentially weighted mean, or `None` with fewer than `min_periods` values.
pub fn ewm_mean_last(values: &[f64], span: usize, min_periods: usize) -> Option<f64> {
    if values.len() < min_periods.max(1) {
        return None;
    }
    let mut acc = EwmAccumulator::new(span);
    values.iter().for_each(|&v| acc.push(v));
    acc.mean()
}

/// Rolling exponentially weighted standard deviation, starting at the
/// `min_periods`-th observation.
pub fn ewm_std_series(values: &[f64], span: usize, min_periods: usize) -> Vec<f64> {
    let mut acc = EwmAccumulator::new(span);
    let mut out = Vec::with_capacity(values.len());
    for &v in values {
        acc.push(v);
        if acc.count() >= min_periods {
            if let Some(std) = acc.std() {
                out.push(std);
            }
        }
    }
    out
}
