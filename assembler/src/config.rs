use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// What to do with top-level blocks whose id has no typed parser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownBlockPolicy {
    /// Keep them in `SwiftMessage::additional_blocks`.
    #[default]
    Keep,
    Reject,
}

/// Message-level rules applied by [`MessageReader`](crate::MessageReader).
///
/// ```toml
/// require-text-block = false
/// unknown-blocks = "reject"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ReaderConfig {
    pub require_text_block: bool,
    pub unknown_blocks: UnknownBlockPolicy,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        ReaderConfig {
            require_text_block: true,
            unknown_blocks: UnknownBlockPolicy::Keep,
        }
    }
}

impl ReaderConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loaded reader config from {}: {:?}", path.display(), config);
        Ok(config)
    }
}
