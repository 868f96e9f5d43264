//! `tokens.toml` configuration
//!
//! ```toml
//! [store]
//! path = "design/variables.json"
//! max_modes = 4
//! library = false
//! ```
//!
//! Command-line flags take precedence over the file.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tokens_core::MemoryStore;

use crate::error::{CliError, Result};

/// File looked up in the working directory when `--config` is not given
pub const CONFIG_FILE: &str = "tokens.toml";

/// Store used when neither a flag nor the config names one
pub const DEFAULT_STORE: &str = ".tokens-store.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub store: StoreSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreSection {
    /// Store file, relative to the working directory
    pub path: Option<PathBuf>,
    /// Per-collection mode limit
    pub max_modes: Option<usize>,
    /// Whether team libraries are available
    pub library: Option<bool>,
}

impl Config {
    /// Load `explicit`, or `tokens.toml` under `dir` when it exists.
    ///
    /// An explicit path that does not exist is an error; a missing default
    /// file simply yields the defaults.
    pub fn load(dir: &Path, explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::user(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                path.to_path_buf()
            }
            None => {
                let path = dir.join(CONFIG_FILE);
                if !path.exists() {
                    return Ok(Self::default());
                }
                path
            }
        };

        tracing::debug!(path = %path.display(), "Loading configuration");
        let content = std::fs::read_to_string(&path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Store path: the flag, then the config, then the default.
    pub fn store_path(&self, dir: &Path, flag: Option<&Path>) -> PathBuf {
        let path = flag
            .map(Path::to_path_buf)
            .or_else(|| self.store.path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE));
        if path.is_absolute() {
            path
        } else {
            dir.join(path)
        }
    }

    /// Open the store at `path`, or start an empty one, then apply the
    /// configured capabilities.
    pub fn open_store(&self, path: &Path) -> Result<MemoryStore> {
        let mut store = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            MemoryStore::from_json(&content)?
        } else {
            tracing::debug!(path = %path.display(), "Store not found, starting empty");
            MemoryStore::new()
        };

        if let Some(limit) = self.store.max_modes {
            store.config_mut().max_modes = Some(limit);
        }
        if let Some(library) = self.store.library {
            store.config_mut().library_enabled = library;
        }
        Ok(store)
    }
}

/// Persist the store as pretty-printed JSON.
pub fn save_store(store: &MemoryStore, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, store.to_json()?)?;
    tracing::debug!(path = %path.display(), "Saved store");
    Ok(())
}
