//! Time-bounded memo of analysis runs, keyed by a content fingerprint.
//!
//! Sits outside the core: the analyzer itself is pure and never consults it.

use crate::domain::analysis::{analyze_universe, AnalysisConfig, AnalysisRun};
use crate::domain::series::PriceSeries;
use dashmap::DashMap;
use std::time::{Duration, Instant};

pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// BLAKE3 over every bar of every series, in input order, plus the config.
///
/// Input order is hashed because ranking ties resolve by it.
pub fn fingerprint(universe: &[PriceSeries], config: &AnalysisConfig) -> String {
    let mut hasher = blake3::Hasher::new();

    hasher.update(&config.capital.to_le_bytes());
    hasher.update(&config.rules.stop_loss_pct.to_le_bytes());
    hasher.update(&config.rules.take_profit_pct.to_le_bytes());
    hasher.update(&config.position_size_pct.to_le_bytes());

    for series in universe {
        hasher.update(series.code.as_bytes());
        hasher.update(&(series.len() as u64).to_le_bytes());
        for bar in &series.bars {
            hasher.update(bar.date.to_string().as_bytes());
            hasher.update(&bar.open.to_le_bytes());
            hasher.update(&bar.high.to_le_bytes());
            hasher.update(&bar.low.to_le_bytes());
            hasher.update(&bar.close.to_le_bytes());
            hasher.update(&bar.volume.to_le_bytes());
        }
    }

    hasher.finalize().to_hex().to_string()
}

struct CacheEntry {
    run: AnalysisRun,
    expires_at: Instant,
}

pub struct AnalysisCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl AnalysisCache {
    /// A zero `ttl` disables caching.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, key: &str) -> Option<AnalysisRun> {
        let entry = self.entries.get(key)?;
        if entry.expires_at > Instant::now() {
            Some(entry.run.clone())
        } else {
            drop(entry);
            self.entries.remove(key);
            None
        }
    }

    pub fn insert(&self, key: String, run: AnalysisRun) {
        if self.ttl.is_zero() {
            return;
        }
        self.entries.insert(
            key,
            CacheEntry {
                run,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Cached run for this exact dataset and config, else a fresh analysis.
    ///
    /// A miss also evicts every expired entry before storing the new run.
    pub fn get_or_analyze(&self, universe: &[PriceSeries], config: &AnalysisConfig) -> AnalysisRun {
        let key = fingerprint(universe, config);
        if let Some(run) = self.get(&key) {
            tracing::debug!(key = %&key[..16], "analysis cache hit");
            return run;
        }
        tracing::debug!(key = %&key[..16], "analysis cache miss");
        self.cleanup();
        let run = analyze_universe(universe, config);
        self.insert(key, run.clone());
        run
    }

    /// Drop expired entries.
    pub fn cleanup(&self) {
        let now = Instant::now();
        self.entries.retain(|_, entry| entry.expires_at > now);
    }

    /// Entries held, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AnalysisCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
