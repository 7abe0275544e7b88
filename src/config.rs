use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default file name looked up next to the tree being processed.
pub const CONFIG_FILE_NAME: &str = "collectsugar.toml";

pub const DEFAULT_LABEL_PREFIX: &str = "___collect_end_";
pub const DEFAULT_ZERO_VALUE: &str = "nil";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: '{key}' {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Knobs for one run of the pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Prefix of synthesized end-of-block labels. Reserved for the pass.
    pub label_prefix: String,
    /// Identifier the target is compared against in synthesized guards.
    pub zero_value: String,
    /// Report every diagnostic instead of stopping at the first one.
    pub keep_going: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            label_prefix: DEFAULT_LABEL_PREFIX.to_string(),
            zero_value: DEFAULT_ZERO_VALUE.to_string(),
            keep_going: true,
        }
    }
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Load `collectsugar.toml` from `dir` if present, defaults otherwise.
    pub fn discover(dir: &Path) -> Result<Self, ConfigError> {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.label_prefix.is_empty() {
            return Err(ConfigError::Invalid {
                key: "label_prefix",
                reason: "must not be empty".to_string(),
            });
        }
        if !is_ident(&self.label_prefix) {
            return Err(ConfigError::Invalid {
                key: "label_prefix",
                reason: format!("'{}' is not a valid identifier prefix", self.label_prefix),
            });
        }
        if !is_ident(&self.zero_value) {
            return Err(ConfigError::Invalid {
                key: "zero_value",
                reason: format!("'{}' is not an identifier", self.zero_value),
            });
        }
        Ok(())
    }
}

fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}
