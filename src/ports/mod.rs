//! Port traits decoupling the domain from data sources and sinks.

pub mod config_port;
pub mod data_port;
pub mod signal_port;
