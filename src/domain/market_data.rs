//! Daily market data as delivered by the feed and roll collaborators.

use chrono::NaiveDate;

use super::instrument::ContractOffset;

/// Raw (non-adjusted) close of one dated contract.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractQuote {
    pub contract: String,
    pub price: f64,
    pub expiry: NaiveDate,
}

/// One instrument's daily bar: back-adjusted continuous price plus the
/// near and further contracts chosen by the roll logic.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyUpdate {
    pub symbol: String,
    pub date: NaiveDate,
    pub adjusted_price: f64,
    pub near: ContractQuote,
    pub further: ContractQuote,
}

impl DailyUpdate {
    pub fn contract(&self, offset: ContractOffset) -> &ContractQuote {
        match offset {
            ContractOffset::Near => &self.near,
            ContractOffset::Further => &self.further,
        }
    }
}
