use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::{
    currency::{CurrencyCode, LocaleConfig},
    errors::{FinanceError, Result},
    recurring::{calendar::DEFAULT_PENDING_DAYS, DEFAULT_PROJECTION_MONTHS},
    utils::{
        paths::{app_data_dir, config_file_in, ensure_dir},
        persistence::write_json_atomic,
    },
};

const DEFAULT_BACKUP_RETENTION: usize = 5;

/// User preferences that shape projections, formatting and storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    pub projection_months: u32,
    pub pending_window_days: u32,
    pub backup_retention: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional custom root for rule books and backups. Defaults to the app data dir.
    pub data_root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_opened_book: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            projection_months: DEFAULT_PROJECTION_MONTHS,
            pending_window_days: DEFAULT_PENDING_DAYS,
            backup_retention: DEFAULT_BACKUP_RETENTION,
            data_root: None,
            last_opened_book: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.projection_months == 0 {
            return Err(FinanceError::ConfigError(
                "projection_months must be at least 1".into(),
            ));
        }
        if self.backup_retention == 0 {
            return Err(FinanceError::ConfigError(
                "backup_retention must be at least 1".into(),
            ));
        }
        if self.currency.trim().is_empty() {
            return Err(FinanceError::ConfigError("currency cannot be empty".into()));
        }
        Ok(())
    }

    pub fn resolve_data_root(&self) -> PathBuf {
        self.data_root.clone().unwrap_or_else(app_data_dir)
    }

    pub fn currency_code(&self) -> CurrencyCode {
        CurrencyCode::new(self.currency.clone())
    }

    pub fn locale_config(&self) -> LocaleConfig {
        LocaleConfig::for_tag(&self.locale)
    }
}

/// Loads and persists [`Config`] as JSON.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        let path = config_file_in(&base);
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        Ok(Self { path })
    }

    /// Reads the stored configuration, falling back to defaults when none exists yet.
    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no configuration file, using defaults");
            return Ok(Config::default());
        }
        let data = std::fs::read_to_string(&self.path)?;
        let config: Config = serde_json::from_str(&data).map_err(|err| {
            warn!(path = %self.path.display(), error = %err, "configuration file is unreadable");
            FinanceError::ConfigError(err.to_string())
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        config.validate()?;
        write_json_atomic(config, &self.path)?;
        debug!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
