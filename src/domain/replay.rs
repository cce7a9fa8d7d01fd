//! Historical replay: unified timeline across instruments, one pass per date.

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::{BTreeSet, HashMap};

use super::error::CarrytrendError;
use super::instrument::InstrumentRegistry;
use super::market_data::DailyUpdate;
use super::signal::{PassReport, SignalEngine};

/// Per-instrument daily bars, each sorted by date.
#[derive(Debug, Clone, Default)]
pub struct MarketHistory {
    pub updates: HashMap<String, Vec<DailyUpdate>>,
}

impl MarketHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: &str, mut updates: Vec<DailyUpdate>) {
        updates.sort_by_key(|u| u.date);
        self.updates.insert(symbol.to_string(), updates);
    }

    pub fn bar_count(&self) -> usize {
        self.updates.values().map(Vec::len).sum()
    }
}

pub fn build_unified_timeline(history: &MarketHistory) -> Vec<NaiveDate> {
    let unique_dates: BTreeSet<NaiveDate> = history
        .updates
        .values()
        .flat_map(|bars| bars.iter().map(|u| u.date))
        .collect();
    unique_dates.into_iter().collect()
}

#[derive(Debug, Clone)]
pub struct ReplayOptions {
    pub portfolio_value: f64,
    /// Dates before this only warm up history.
    pub start_date: Option<NaiveDate>,
}

/// Feed every date's bars into the engine and run a pass after each date.
///
/// `valid_until` derives the signal expiry for a pass date.
pub fn replay<F>(
    engine: &mut SignalEngine,
    registry: &InstrumentRegistry,
    history: &MarketHistory,
    options: &ReplayOptions,
    valid_until: F,
) -> Result<Vec<PassReport>, CarrytrendError>
where
    F: Fn(NaiveDate) -> NaiveDateTime,
{
    let timeline = build_unified_timeline(history);
    let mut by_date: HashMap<NaiveDate, Vec<&DailyUpdate>> = HashMap::new();
    for bars in history.updates.values() {
        for update in bars {
            by_date.entry(update.date).or_default().push(update);
        }
    }

    tracing::info!(
        dates = timeline.len(),
        instruments = registry.len(),
        "replaying market history"
    );

    let mut reports = Vec::new();
    for date in timeline {
        for update in by_date.remove(&date).unwrap_or_default() {
            if registry.contains(&update.symbol) {
                engine.ingest(update);
            }
        }

        if options.start_date.is_some_and(|start| date < start) {
            continue;
        }

        if let Some(report) =
            engine.run_pass(date, registry, options.portfolio_value, valid_until(date))?
        {
            reports.push(report);
        }
    }
    Ok(reports)
}
