//! Compiler settings, optionally loaded from a TOML file.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

/// Name of the variable that designates the player's starting room.
pub const DEFAULT_START_LOCATION_VAR: &str = "playerLocation";

/// Names that may head a script expression without being declared symbols.
/// Each stands for one of the definition's top-level collections.
pub const DEFAULT_EXPRESSION_ROOTS: [&str; 5] = ["variables", "items", "rooms", "commands", "scripts"];

/// Settings that shape one compilation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    /// Reserved variable whose value must name a room.
    pub start_location_var: String,
    pub expression_roots: Vec<String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            start_location_var: DEFAULT_START_LOCATION_VAR.to_string(),
            expression_roots: DEFAULT_EXPRESSION_ROOTS.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

/// Errors raised while reading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unable to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: start_location_var must not be empty")]
    EmptyStartVariable,
}

impl CompilerConfig {
    /// Parse settings from TOML text; absent keys keep their defaults.
    ///
    /// # Errors
    /// Returns an error for malformed TOML, unknown keys, or an empty start variable.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: CompilerConfig = toml::from_str(text)?;
        if config.start_location_var.trim().is_empty() {
            return Err(ConfigError::EmptyStartVariable);
        }
        Ok(config)
    }

    /// Load settings from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        info!(
            "compiler config loaded from {} (start variable '{}')",
            path.display(),
            config.start_location_var
        );
        Ok(config)
    }

    pub fn is_expression_root(&self, name: &str) -> bool {
        self.expression_roots.iter().any(|root| root == name)
    }
}
