//! Configuration
//!
//! User settings read from `<config dir>/svifpod/config.toml`. A missing file
//! yields the defaults; single keys can be overridden from the environment.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ViewerResult;

/// Name of the folder used both under the config dir and the temp dir
pub const WORKING_DIR: &str = "svifpod";

/// Environment override for `add_view_context_entry_to_debug_variables`
pub const ADD_VIEW_CONTEXT_ENV: &str = "SVIFPOD_ADD_VIEW_CONTEXT";

/// Extension settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Config {
    /// Inject the image viewer menu context into `variables` responses
    pub add_view_context_entry_to_debug_variables: bool,
    /// Sub folder of the temp dir that receives exported images
    pub working_dir_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            add_view_context_entry_to_debug_variables: false,
            working_dir_name: WORKING_DIR.to_string(),
        }
    }
}

impl Config {
    /// Default location of the configuration file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(WORKING_DIR).join("config.toml"))
    }

    /// Load from the default location, falling back to defaults
    pub fn load() -> ViewerResult<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default().with_env_overrides()),
        }
    }

    /// Load from an explicit path, then apply environment overrides.
    /// A missing file is not an error.
    pub fn load_from(path: &Path) -> ViewerResult<Self> {
        Ok(Self::read_file(path)?.with_env_overrides())
    }

    fn read_file(path: &Path) -> ViewerResult<Self> {
        if !path.exists() {
            debug!("No configuration at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Parse TOML content
    pub fn parse(content: &str) -> ViewerResult<Self> {
        Ok(toml::from_str(content)?)
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(value) = std::env::var(ADD_VIEW_CONTEXT_ENV) {
            self.add_view_context_entry_to_debug_variables =
                matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        self
    }
}
