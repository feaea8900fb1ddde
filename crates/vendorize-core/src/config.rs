//! Run configuration: which browsers to target and how to print the result.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::logging::targets;
use crate::plugin::SupportMatrix;
use crate::serialize::CodeStyle;
use crate::{Error, Result};

/// Configuration for a transformation run.
///
/// ```toml
/// [support]
/// chrome = 30
/// firefox = false
///
/// [style]
/// linebreak = "\n"
/// ```
///
/// Without a `[support]` table every plugin fix applies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Targeted browsers; `None` applies every fix.
    pub support: Option<SupportMatrix>,
    /// Output style.
    pub style: CodeStyle,
    /// Source file path, when loaded from disk.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load a configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

        let mut config = Self::from_toml_str(&content)?;
        config.source_path = Some(path.to_path_buf());
        tracing::debug!(target: targets::CONFIG, path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// The support matrix to pass to a traversal.
    pub fn support(&self) -> Option<&SupportMatrix> {
        self.support.as_ref()
    }
}
