//! INI file configuration adapter.

use crate::domain::error::TradescoreError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl Default for FileConfigAdapter {
    /// No sections; every lookup falls back to its default.
    fn default() -> Self {
        Self { config: Ini::new() }
    }
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TradescoreError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config.load(path).map_err(|reason| TradescoreError::ConfigParse {
            file: path.display().to_string(),
            reason,
        })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    /// Replace one value, as a command-line flag does over the file.
    pub fn set(&mut self, section: &str, key: &str, value: impl ToString) {
        self.config.set(section, key, Some(value.to_string()));
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key).filter(|v| !v.trim().is_empty())
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }
}
