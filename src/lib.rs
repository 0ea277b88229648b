//! tradescore: technical signal scoring and position sizing.
//!
//! Hexagonal architecture: pure scoring logic in [`domain`], port traits in [`ports`],
//! concrete file/config implementations in [`adapters`], command line in [`cli`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
