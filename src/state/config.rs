//! Application configuration with persistence.
//!
//! The configuration file is stored at:
//! - Linux: `~/.config/dexnav/config.json`
//! - macOS: `~/Library/Application Support/dexnav/config.json`
//! - Windows: `%APPDATA%/dexnav/config.json`
//!
//! # Example
//!
//! ```ignore
//! use dexnav::state::AppConfig;
//!
//! let path = AppConfig::config_path()?;
//! AppConfig::update_file(&path, |config| {
//!     config.default_chain = ChainId::POLYGON;
//!     Ok(())
//! })?;
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use serde::{Deserialize, Serialize};

use crate::constants::{APP_NAME, CONFIG_FILE, DEFAULT_CHAIN, SETTINGS_RESET_DELAY};
use crate::domain::{ChainId, CustomExplorer, ExplorerRegistry, NavError};

// ============================================================================
// AppConfig
// ============================================================================

fn default_chain() -> ChainId {
    DEFAULT_CHAIN
}

fn default_reset_delay_ms() -> u64 {
    u64::try_from(SETTINGS_RESET_DELAY.as_millis()).unwrap_or(u64::MAX)
}

/// Persistent configuration.
///
/// # Fields
///
/// * `default_chain` - Chain used when a command does not name one
/// * `settings_reset_delay_ms` - Delay before the drawer menu resets after closing
/// * `custom_explorers` - Explorers layered over the built-in table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default = "default_chain")]
    pub default_chain: ChainId,
    #[serde(default = "default_reset_delay_ms")]
    pub settings_reset_delay_ms: u64,
    #[serde(default)]
    pub custom_explorers: Vec<CustomExplorer>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_chain: default_chain(),
            settings_reset_delay_ms: default_reset_delay_ms(),
            custom_explorers: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Returns `<config_dir>/dexnav/config.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform has no configuration directory.
    pub fn config_path() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .ok_or_else(|| eyre!("No configuration directory on this platform"))?;
        Ok(dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Loads the configuration for read-only use.
    ///
    /// A broken file is reported and replaced by defaults so that link
    /// resolution keeps working. Never save a configuration obtained here.
    #[must_use]
    pub fn load() -> Self {
        Self::try_load().unwrap_or_else(|err| {
            tracing::warn!("Ignoring configuration: {err:#}");
            Self::default()
        })
    }

    /// Loads the configuration from the default location.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::load_from`].
    pub fn try_load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Loads the configuration stored at `path`.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => {
                return Err(err).wrap_err_with(|| format!("Failed to read {}", path.display()));
            }
        };
        serde_json::from_str(&content)
            .wrap_err_with(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Saves the configuration to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be determined or the file cannot
    /// be written.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Saves the configuration to `path`, creating its directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).wrap_err_with(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Loads the file at `path`, applies `edit` and writes the result back.
    ///
    /// Nothing is written unless both the load and the edit succeed, so a
    /// file that does not parse is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if loading, editing or saving fails.
    pub fn update_file<T>(
        path: &Path,
        edit: impl FnOnce(&mut Self) -> Result<T, NavError>,
    ) -> Result<T> {
        let mut config = Self::load_from(path)?;
        let output = edit(&mut config)?;
        config.save_to(path)?;
        Ok(output)
    }

    /// Delay before the drawer menu resets after the drawer closes.
    #[must_use]
    pub const fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.settings_reset_delay_ms)
    }

    /// Builds an explorer registry from the configured custom explorers.
    ///
    /// Explorers that fail validation or repeat a chain are skipped with a
    /// warning; the remaining ones still apply.
    #[must_use]
    pub fn registry(&self) -> ExplorerRegistry {
        let mut registry = ExplorerRegistry::builtin();
        for explorer in &self.custom_explorers {
            if let Err(err) = registry.insert(explorer.clone()) {
                tracing::warn!("Skipping custom explorer '{}': {err}", explorer.name);
            }
        }
        registry
    }

    /// Validates and stores a custom explorer without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the explorer is invalid or its chain already has
    /// a custom explorer.
    pub fn insert_custom_explorer(&mut self, explorer: CustomExplorer) -> Result<(), NavError> {
        let explorer = explorer.validated()?;
        if self
            .custom_explorers
            .iter()
            .any(|existing| existing.chain_id == explorer.chain_id)
        {
            return Err(NavError::DuplicateExplorer(explorer.chain_id));
        }
        self.custom_explorers.push(explorer);
        Ok(())
    }

    /// Removes the custom explorer for `chain_id` without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if no custom explorer is configured for the chain.
    pub fn take_custom_explorer(&mut self, chain_id: ChainId) -> Result<CustomExplorer, NavError> {
        let index = self
            .custom_explorers
            .iter()
            .position(|explorer| explorer.chain_id == chain_id)
            .ok_or(NavError::UnknownExplorer(chain_id))?;
        Ok(self.custom_explorers.remove(index))
    }

    /// Adds a custom explorer to the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded, the explorer is
    /// rejected or saving fails.
    pub fn add_custom_explorer(explorer: CustomExplorer) -> Result<()> {
        Self::update_file(&Self::config_path()?, |config| {
            config.insert_custom_explorer(explorer)
        })
    }

    /// Removes the custom explorer for `chain_id` from the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded, the chain has no custom
    /// explorer or saving fails.
    pub fn remove_custom_explorer(chain_id: ChainId) -> Result<CustomExplorer> {
        Self::update_file(&Self::config_path()?, |config| {
            config.take_custom_explorer(chain_id)
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
