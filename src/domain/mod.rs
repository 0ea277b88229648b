//! Core domain types and pure scoring logic.

pub mod ohlcv;
pub mod series;
pub mod indicator;
pub mod scoring;
pub mod signal;
pub mod risk;
pub mod sizing;
pub mod analysis;
pub mod portfolio;
pub mod odds;
pub mod config_validation;
pub mod error;
