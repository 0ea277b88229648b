//! CSV directory data adapter.
//!
//! One file per instrument. The code is the file stem up to the first `.`,
//! uppercased, so `snts.sn.csv` is `SNTS`. Two header layouts are accepted:
//! the SikaFinance export (`d,o,h,l,c,v`, with `d` a day serial counted from
//! 1900-01-01) and plain `date,open,high,low,close,volume` with ISO dates.

use crate::domain::error::TradescoreError;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::series::PriceSeries;
use crate::ports::data_port::{keep_loaded, DataPort};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub struct CsvAdapter {
    base_path: PathBuf,
}

#[derive(Debug)]
struct Columns {
    date: usize,
    close: usize,
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    volume: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord, source: &str) -> Result<Self, TradescoreError> {
        let find = |names: [&str; 2]| {
            headers
                .iter()
                .position(|h| names.contains(&h.trim().to_lowercase().as_str()))
        };
        Ok(Columns {
            date: find(["d", "date"])
                .ok_or_else(|| TradescoreError::data(source, "missing date column"))?,
            close: find(["c", "close"])
                .ok_or_else(|| TradescoreError::data(source, "missing close column"))?,
            open: find(["o", "open"]),
            high: find(["h", "high"]),
            low: find(["l", "low"]),
            volume: find(["v", "volume"]),
        })
    }
}

fn serial_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Day serial from 1900-01-01 (fractions truncated) or `YYYY-MM-DD`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(serial) = raw.parse::<f64>() {
        if !serial.is_finite() || serial < 0.0 {
            return None;
        }
        return serial_epoch().checked_add_days(chrono::Days::new(serial.floor() as u64));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

fn parse_field(record: &csv::StringRecord, index: usize, name: &str, source: &str, line: u64) -> Result<Option<f64>, TradescoreError> {
    match record.get(index).map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse::<f64>().map(Some).map_err(|e| {
            TradescoreError::data(source, format!("line {}: invalid {} value {:?}: {}", line, name, raw, e))
        }),
    }
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn code_for_path(path: &Path) -> Option<String> {
        let name = path.file_name()?.to_str()?;
        let stem = name.split('.').next()?;
        if stem.is_empty() {
            None
        } else {
            Some(stem.to_uppercase())
        }
    }

    /// Code → file, first file winning when two stems collide.
    fn files(&self) -> Result<BTreeMap<String, PathBuf>, TradescoreError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| {
            TradescoreError::data(
                self.base_path.display().to_string(),
                format!("failed to read directory: {}", e),
            )
        })?;

        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let is_csv = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
            if is_csv && path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        let mut files: BTreeMap<String, PathBuf> = BTreeMap::new();
        for path in paths {
            let Some(code) = Self::code_for_path(&path) else {
                continue;
            };
            if let Some(existing) = files.get(&code) {
                tracing::warn!(
                    code = %code,
                    kept = %existing.display(),
                    ignored = %path.display(),
                    "duplicate instrument file"
                );
                continue;
            }
            files.insert(code, path);
        }
        Ok(files)
    }

    pub fn read_file(path: &Path, code: &str) -> Result<PriceSeries, TradescoreError> {
        let source = path.display().to_string();
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(path)
            .map_err(|e| TradescoreError::data(&source, e.to_string()))?;

        let headers = rdr
            .headers()
            .map_err(|e| TradescoreError::data(&source, e.to_string()))?
            .clone();
        let columns = Columns::from_headers(&headers, &source)?;

        // keyed by date so a later duplicate replaces the earlier row
        let mut rows: BTreeMap<NaiveDate, OhlcvBar> = BTreeMap::new();
        for result in rdr.records() {
            let record = result.map_err(|e| TradescoreError::data(&source, format!("CSV parse error: {}", e)))?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            let raw_date = record.get(columns.date).unwrap_or("");
            let date = parse_date(raw_date).ok_or_else(|| {
                TradescoreError::data(&source, format!("line {}: invalid date {:?}", line, raw_date))
            })?;
            let close = parse_field(&record, columns.close, "close", &source, line)?
                .ok_or_else(|| TradescoreError::data(&source, format!("line {}: missing close", line)))?;

            let optional = |index: Option<usize>, name: &str| match index {
                Some(i) => parse_field(&record, i, name, &source, line),
                None => Ok(None),
            };
            let open = optional(columns.open, "open")?.unwrap_or(close);
            let high = optional(columns.high, "high")?.unwrap_or(close);
            let low = optional(columns.low, "low")?.unwrap_or(close);
            let volume = optional(columns.volume, "volume")?.unwrap_or(0.0) as i64;

            rows.insert(
                date,
                OhlcvBar {
                    open,
                    high,
                    low,
                    volume,
                    ..OhlcvBar::from_close(code, date, close)
                },
            );
        }

        tracing::debug!(code = %code, rows = rows.len(), file = %source, "loaded");
        Ok(PriceSeries::new(code, rows.into_values().collect()))
    }
}

impl DataPort for CsvAdapter {
    fn list_symbols(&self) -> Result<Vec<String>, TradescoreError> {
        Ok(self.files()?.into_keys().collect())
    }

    fn fetch_series(&self, code: &str) -> Result<PriceSeries, TradescoreError> {
        let code = code.to_uppercase();
        let files = self.files()?;
        let path = files
            .get(&code)
            .ok_or_else(|| TradescoreError::NoData { code: code.clone() })?;
        Self::read_file(path, &code)
    }

    /// One directory scan for the whole universe.
    fn fetch_universe(&self) -> Result<Vec<PriceSeries>, TradescoreError> {
        Ok(self
            .files()?
            .iter()
            .filter_map(|(code, path)| keep_loaded(code, Self::read_file(path, code)))
            .collect())
    }
}
