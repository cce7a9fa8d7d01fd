//! Market data access port trait.

use crate::domain::error::CarrytrendError;
use crate::domain::market_data::DailyUpdate;
use chrono::NaiveDate;

pub trait MarketDataPort {
    /// Daily bars for `symbol` within `[start_date, end_date]`, sorted by date.
    fn fetch_daily(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<DailyUpdate>, CarrytrendError>;

    fn list_instruments(&self) -> Result<Vec<String>, CarrytrendError>;
}
