//! OHLCV bar representation.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub code: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl OhlcvBar {
    /// Bar with only a closing price known; open/high/low copy the close.
    pub fn from_close(code: &str, date: NaiveDate, close: f64) -> Self {
        OhlcvBar {
            code: code.to_string(),
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: 0,
        }
    }
}
