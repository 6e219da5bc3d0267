//! Domain error types.
//!
//! Fatal conditions only. Short series and arithmetic edge cases are
//! expressed as undefined indicator values or documented fallbacks instead.

use chrono::NaiveDateTime;

/// Top-level error type for sigtrader.
#[derive(Debug, thiserror::Error)]
pub enum SigtraderError {
    #[error("invalid configuration {key}: {reason}")]
    InvalidConfiguration { key: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error(
        "bar {index} is out of order: timestamp {current} does not follow {previous}"
    )]
    DataOrderingViolation {
        index: usize,
        previous: NaiveDateTime,
        current: NaiveDateTime,
    },

    #[error("invalid bar {index}: {reason}")]
    InvalidBar { index: usize, reason: String },

    #[error("signal count {signals} does not match bar count {bars}")]
    SignalLengthMismatch { bars: usize, signals: usize },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SigtraderError {
    pub(crate) fn invalid_config(key: &str, reason: impl Into<String>) -> Self {
        SigtraderError::InvalidConfiguration {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&SigtraderError> for std::process::ExitCode {
    fn from(err: &SigtraderError) -> Self {
        let code: u8 = match err {
            SigtraderError::Io(_) | SigtraderError::Json(_) | SigtraderError::Csv(_) => 1,
            SigtraderError::InvalidConfiguration { .. }
            | SigtraderError::ConfigParse { .. }
            | SigtraderError::ConfigMissing { .. } => 2,
            SigtraderError::DataSource { .. } => 3,
            SigtraderError::DataOrderingViolation { .. } | SigtraderError::InvalidBar { .. } => 4,
            SigtraderError::SignalLengthMismatch { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
