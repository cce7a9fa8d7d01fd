//! Streaming exponential moving average and EWMAC.
//!
//! k = 2/(n+1). Until n samples have been seen the value is the running
//! simple mean of the samples so far, then EMA[i] = C[i]*k + EMA[i-1]*(1-k).

use super::span_alpha;

#[derive(Debug, Clone, PartialEq)]
pub struct Ema {
    period: usize,
    k: f64,
    samples: usize,
    sum: f64,
    value: Option<f64>,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self {
            period: period.max(1),
            k: span_alpha(period.max(1)),
            samples: 0,
            sum: 0.0,
            value: None,
        }
    }

    pub fn update(&mut self, close: f64) {
        self.samples += 1;
        let next = match self.value {
            Some(prev) if self.samples > self.period => close * self.k + prev * (1.0 - self.k),
            _ => {
                self.sum += close;
                self.sum / self.samples as f64
            }
        };
        self.value = Some(next);
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

/// Fast EMA minus slow EMA, with the slow span fixed at four times the fast.
#[derive(Debug, Clone, PartialEq)]
pub struct Ewmac {
    fast: Ema,
    slow: Ema,
}

pub const SLOW_SPAN_MULTIPLE: usize = 4;

impl Ewmac {
    pub fn new(fast_span: usize) -> Self {
        Self {
            fast: Ema::new(fast_span),
            slow: Ema::new(fast_span * SLOW_SPAN_MULTIPLE),
        }
    }

    pub fn update(&mut self, close: f64) {
        self.fast.update(close);
        self.slow.update(close);
    }

    pub fn fast_span(&self) -> usize {
        self.fast.period()
    }

    pub fn value(&self) -> Option<f64> {
        Some(self.fast.value()? - self.slow.value()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ema_empty_has_no_value() {
        let ema = Ema::new(3);
        assert_eq!(ema.value(), None);
    }

    #[test]
    fn ema_warmup_is_running_mean() {
        let mut ema = Ema::new(3);
        ema.update(10.0);
        assert_relative_eq!(ema.value().unwrap(), 10.0);
        ema.update(20.0);
        assert_relative_eq!(ema.value().unwrap(), 15.0);
        ema.update(30.0);
        assert_relative_eq!(ema.value().unwrap(), 20.0);
    }

    #[test]
    fn ema_recursive_calculation() {
        let mut ema = Ema::new(3);
        for close in [10.0, 20.0, 30.0, 40.0, 50.0] {
            ema.update(close);
        }
        let k = 2.0 / 4.0;
        let sma = 20.0;
        let ema_3 = 40.0 * k + sma * (1.0 - k);
        let ema_4 = 50.0 * k + ema_3 * (1.0 - k);
        assert_relative_eq!(ema.value().unwrap(), ema_4);
    }

    #[test]
    fn ema_period_1_tracks_close() {
        let mut ema = Ema::new(1);
        ema.update(10.0);
        ema.update(20.0);
        assert_relative_eq!(ema.value().unwrap(), 20.0);
    }

    #[test]
    fn ema_period_0_behaves_as_1() {
        let mut ema = Ema::new(0);
        ema.update(7.0);
        assert_eq!(ema.period(), 1);
    }

    #[test]
    fn ewmac_flat_series_is_zero() {
        let mut ewmac = Ewmac::new(4);
        for _ in 0..40 {
            ewmac.update(100.0);
        }
        assert_relative_eq!(ewmac.value().unwrap(), 0.0);
    }

    #[test]
    fn ewmac_rising_series_is_positive() {
        let mut ewmac = Ewmac::new(4);
        for i in 0..40 {
            ewmac.update(100.0 + i as f64);
        }
        assert!(ewmac.value().unwrap() > 0.0);
    }

    #[test]
    fn ewmac_falling_series_is_negative() {
        let mut ewmac = Ewmac::new(2);
        for i in 0..20 {
            ewmac.update(100.0 - i as f64);
        }
        assert!(ewmac.value().unwrap() < 0.0);
    }

    #[test]
    fn ewmac_slow_span_is_four_times_fast() {
        let ewmac = Ewmac::new(16);
        assert_eq!(ewmac.fast_span(), 16);
        assert_eq!(ewmac.slow.period(), 64);
    }
}
