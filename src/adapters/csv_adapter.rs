//! CSV file market data adapter.
//!
//! One file per instrument, `<base_path>/<SYMBOL>.csv`, with header
//! `date,adjusted,near_contract,near_price,near_expiry,further_contract,further_price,further_expiry`.

use crate::domain::error::CarrytrendError;
use crate::domain::market_data::{ContractQuote, DailyUpdate};
use crate::ports::data_port::MarketDataPort;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Deserialize)]
struct DailyRow {
    date: String,
    adjusted: f64,
    near_contract: String,
    near_price: f64,
    near_expiry: String,
    further_contract: String,
    further_price: f64,
    further_expiry: String,
}

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    fn parse_date(value: &str, column: &str) -> Result<NaiveDate, CarrytrendError> {
        NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e| CarrytrendError::Data {
            reason: format!("invalid {} '{}': {}", column, value, e),
        })
    }

    fn to_update(symbol: &str, row: DailyRow) -> Result<DailyUpdate, CarrytrendError> {
        Ok(DailyUpdate {
            symbol: symbol.to_string(),
            date: Self::parse_date(&row.date, "date")?,
            adjusted_price: row.adjusted,
            near: ContractQuote {
                contract: row.near_contract,
                price: row.near_price,
                expiry: Self::parse_date(&row.near_expiry, "near_expiry")?,
            },
            further: ContractQuote {
                contract: row.further_contract,
                price: row.further_price,
                expiry: Self::parse_date(&row.further_expiry, "further_expiry")?,
            },
        })
    }
}

impl MarketDataPort for CsvAdapter {
    fn fetch_daily(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<DailyUpdate>, CarrytrendError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| CarrytrendError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        // Later rows for the same date replace earlier ones.
        let mut by_date = BTreeMap::new();
        for result in rdr.deserialize::<DailyRow>() {
            let row = result.map_err(|e| CarrytrendError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;
            let update = Self::to_update(symbol, row)?;
            if update.date < start_date || update.date > end_date {
                continue;
            }
            by_date.insert(update.date, update);
        }

        Ok(by_date.into_values().collect())
    }

    fn list_instruments(&self) -> Result<Vec<String>, CarrytrendError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| CarrytrendError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CarrytrendError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
