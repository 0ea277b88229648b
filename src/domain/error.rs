//! Error types for the I/O and configuration edges.
//!
//! Per-instrument failures inside the core (short history, undefined indicators,
//! degenerate arithmetic) are values, not errors; see `analysis` and `indicator`.

use crate::domain::odds::OddsError;

/// Top-level error type for tradescore.
#[derive(Debug, thiserror::Error)]
pub enum TradescoreError {
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

    #[error("data error in {source_name}: {reason}")]
    Data { source_name: String, reason: String },

    #[error("no data for {code}")]
    NoData { code: String },

    #[error("no instrument has at least {minimum} bars ({skipped} skipped)")]
    NoAnalyzableData { minimum: usize, skipped: usize },

    #[error(transparent)]
    Odds(#[from] OddsError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TradescoreError {
    pub fn data(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        TradescoreError::Data {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        TradescoreError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&TradescoreError> for std::process::ExitCode {
    fn from(err: &TradescoreError) -> Self {
        let code: u8 = match err {
            TradescoreError::Io(_) => 1,
            TradescoreError::ConfigParse { .. }
            | TradescoreError::ConfigMissing { .. }
            | TradescoreError::ConfigInvalid { .. } => 2,
            TradescoreError::Data { .. } => 3,
            TradescoreError::Odds(_) => 4,
            TradescoreError::NoData { .. } | TradescoreError::NoAnalyzableData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
