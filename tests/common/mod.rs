#![allow(dead_code)]

use chrono::NaiveDate;
pub use tradescore::domain::ohlcv::OhlcvBar;
use tradescore::domain::error::TradescoreError;
use tradescore::domain::series::PriceSeries;
use tradescore::ports::data_port::DataPort;
use std::cell::Cell;
use std::collections::BTreeMap;

pub struct MockDataPort {
    pub data: BTreeMap<String, Vec<OhlcvBar>>,
    pub errors: BTreeMap<String, String>,
    pub fetches: Cell<usize>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: BTreeMap::new(),
            errors: BTreeMap::new(),
            fetches: Cell::new(0),
        }
    }

    pub fn with_bars(mut self, code: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(code.to_string(), bars);
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn list_symbols(&self) -> Result<Vec<String>, TradescoreError> {
        let mut codes: Vec<String> = self.data.keys().chain(self.errors.keys()).cloned().collect();
        codes.sort();
        codes.dedup();
        Ok(codes)
    }

    fn fetch_series(&self, code: &str) -> Result<PriceSeries, TradescoreError> {
        self.fetches.set(self.fetches.get() + 1);
        if let Some(reason) = self.errors.get(code) {
            return Err(TradescoreError::data(code, reason.clone()));
        }
        match self.data.get(code) {
            Some(bars) => Ok(PriceSeries::new(code, bars.clone())),
            None => Err(TradescoreError::NoData { code: code.to_string() }),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Daily close-only bars starting at `start`.
pub fn bars_from_closes(code: &str, start: &str, closes: &[f64]) -> Vec<OhlcvBar> {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| OhlcvBar::from_close(code, start + chrono::Duration::days(i as i64), c))
        .collect()
}

/// Linear path `start_price + step * i` over `count` days from 2024-01-01.
pub fn linear_bars(code: &str, count: usize, start_price: f64, step: f64) -> Vec<OhlcvBar> {
    let closes: Vec<f64> = (0..count).map(|i| start_price + step * i as f64).collect();
    bars_from_closes(code, "2024-01-01", &closes)
}

/// SikaFinance-style CSV body: `d,o,h,l,c,v` with day serials from 1900-01-01.
pub fn sikafinance_csv(bars: &[OhlcvBar]) -> String {
    let epoch = date(1900, 1, 1);
    let mut out = String::from("d,o,h,l,c,v\n");
    for bar in bars {
        let serial = (bar.date - epoch).num_days();
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            serial, bar.open, bar.high, bar.low, bar.close, bar.volume
        ));
    }
    out
}
