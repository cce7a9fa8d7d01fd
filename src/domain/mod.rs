//! Core domain types and signal logic.

pub mod time_series;
pub mod market_data;
pub mod instrument;
pub mod indicator;
pub mod history;
pub mod volatility;
pub mod forecast;
pub mod sizing;
pub mod allocation;
pub mod strategy;
pub mod signal;
pub mod replay;
pub mod config_validation;
pub mod error;
