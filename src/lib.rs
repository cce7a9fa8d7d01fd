//! carrytrend: daily carry and trend signals for a futures portfolio.
//!
//! Hexagonal architecture: signal logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
