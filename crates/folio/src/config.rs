//! Configuration management for folio.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "folio";

/// Catalog location naming the sample catalog compiled into the binary.
pub const BUNDLED_CATALOG: &str = "bundled:books-sample.json";

/// Default notes database file name.
const NOTES_DATABASE_FILE_NAME: &str = "notes.db";

/// Key under which the notes collection is stored.
pub const DEFAULT_NOTES_KEY: &str = "voice-notes";

/// Cover reference used when an item has none.
pub const DEFAULT_PLACEHOLDER_COVER: &str = "/covers/placeholder.jpg";

/// Number of items per results page.
pub const DEFAULT_PAGE_SIZE: usize = 8;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `FOLIO_`, sections split on `__`)
/// 2. TOML config file at `~/.config/folio/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog configuration.
    pub catalog: CatalogConfig,
    /// Notes configuration.
    pub notes: NotesConfig,
    /// Capability configuration.
    pub capabilities: CapabilitiesConfig,
}

/// Catalog-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// File path or HTTP(S) URL of the catalog.
    /// Defaults to the bundled sample catalog.
    pub source: Option<String>,
    /// Items per results page.
    pub page_size: usize,
    /// Cover reference substituted for items without one.
    pub placeholder_cover: String,
    /// Maximum number of rows read from a CSV catalog.
    pub csv_max_rows: usize,
}

/// Notes-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotesConfig {
    /// Path to the notes database.
    /// Defaults to `~/.local/share/folio/notes.db`
    pub database_path: Option<PathBuf>,
    /// Key the serialized notes collection is stored under.
    pub storage_key: String,
}

/// Which platform capabilities are present.
///
/// Capabilities are declared here and injected at startup; nothing probes
/// the platform later on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapabilitiesConfig {
    /// A speech recognition engine is installed.
    pub speech: bool,
    /// An audio input device is present.
    pub audio: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: None,
            page_size: DEFAULT_PAGE_SIZE,
            placeholder_cover: DEFAULT_PLACEHOLDER_COVER.to_string(),
            csv_max_rows: 200,
        }
    }
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            storage_key: DEFAULT_NOTES_KEY.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("FOLIO_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.catalog.page_size == 0 {
            return Err(Error::ConfigValidation {
                message: "catalog.page_size must be greater than 0".to_string(),
            });
        }

        if self.catalog.csv_max_rows == 0 {
            return Err(Error::ConfigValidation {
                message: "catalog.csv_max_rows must be greater than 0".to_string(),
            });
        }

        if let Some(source) = &self.catalog.source {
            if source.trim().is_empty() {
                return Err(Error::ConfigValidation {
                    message: "catalog.source cannot be empty".to_string(),
                });
            }
        }

        if self.notes.storage_key.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "notes.storage_key cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Get the catalog source, falling back to [`BUNDLED_CATALOG`].
    #[must_use]
    pub fn catalog_source(&self) -> String {
        self.catalog
            .source
            .clone()
            .unwrap_or_else(|| BUNDLED_CATALOG.to_string())
    }

    /// Get the notes database path, resolving defaults if not set.
    #[must_use]
    pub fn notes_database_path(&self) -> PathBuf {
        self.notes
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(NOTES_DATABASE_FILE_NAME))
    }
}
