//! Domain error types.

/// Top-level error type for carrytrend.
#[derive(Debug, thiserror::Error)]
pub enum CarrytrendError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("market data error: {reason}")]
    Data { reason: String },

    #[error("no market data for {symbol}")]
    NoData { symbol: String },

    #[error("no forecast scalar for trend span {span}")]
    UnknownTrendSpan { span: usize },

    #[error("rule count {count} has no forecast diversification multiplier (valid range {min}..={max})")]
    RuleCountOutOfRange { count: usize, min: usize, max: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&CarrytrendError> for std::process::ExitCode {
    fn from(err: &CarrytrendError) -> Self {
        let code: u8 = match err {
            CarrytrendError::Io(_) => 1,
            CarrytrendError::ConfigParse { .. }
            | CarrytrendError::ConfigMissing { .. }
            | CarrytrendError::ConfigInvalid { .. } => 2,
            CarrytrendError::Data { .. } => 3,
            CarrytrendError::UnknownTrendSpan { .. }
            | CarrytrendError::RuleCountOutOfRange { .. } => 4,
            CarrytrendError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
