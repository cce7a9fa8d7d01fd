//! Date-indexed price series.

use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Strictly increasing by date. Writing the latest date again overwrites it;
/// writing an older date is ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    points: Vec<PricePoint>,
}

impl TimeSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when `date` is older than the latest stored point.
    pub fn upsert(&mut self, date: NaiveDate, value: f64) -> bool {
        match self.points.last_mut() {
            Some(last) if last.date == date => {
                last.value = value;
                true
            }
            Some(last) if last.date > date => false,
            _ => {
                self.points.push(PricePoint { date, value });
                true
            }
        }
    }

    /// Drop every point dated before `cutoff`.
    pub fn prune_before(&mut self, cutoff: NaiveDate) {
        let keep_from = self.points.partition_point(|p| p.date < cutoff);
        self.points.drain(..keep_from);
    }

    /// Keep only the most recent `n` points.
    pub fn retain_last(&mut self, n: usize) {
        let excess = self.points.len().saturating_sub(n);
        self.points.drain(..excess);
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|i| self.points[i].value)
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
