//! Pickler configuration via `refpack.toml`
//!
//! Every field has a default, so an empty file (or no file) gives the
//! standard behaviour: MessagePack bytes, unresolved entities passed
//! through with a warning, empty values still serialized.

use crate::format::Format;
use refpack_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "refpack.toml";

/// What the encoder does with an entity whose model has no type key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedPolicy {
    /// Leave the entity in place and log a warning
    #[default]
    PassThrough,
    /// Fail with `Error::UnresolvedTypeKey`
    Error,
}

/// Pickler configuration loaded from `refpack.toml`.
///
/// # Example
///
/// ```toml
/// format = "msgpack"
/// on_unresolved = "error"
/// allow_empty = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickleConfig {
    /// Byte format: `"msgpack"` or `"bincode"`.
    #[serde(default)]
    pub format: Format,
    /// Unresolved entity handling: `"pass_through"` or `"error"`.
    #[serde(default)]
    pub on_unresolved: UnresolvedPolicy,
    /// Serialize empty results (null, zero, empty containers) too.
    #[serde(default = "default_allow_empty")]
    pub allow_empty: bool,
}

fn default_allow_empty() -> bool {
    true
}

impl Default for PickleConfig {
    fn default() -> Self {
        Self {
            format: Format::default(),
            on_unresolved: UnresolvedPolicy::default(),
            allow_empty: default_allow_empty(),
        }
    }
}

impl PickleConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# refpack configuration
#
# Byte format for pickles: "msgpack" (default) or "bincode"
format = "msgpack"

# Entities whose model has no type key:
#   "pass_through" = leave the live entity in place and log a warning (default)
#   "error"        = fail the encode
on_unresolved = "pass_through"

# Serialize empty results (null, 0, "", empty containers) as well.
# When false those are returned as plain values; false itself is always serialized.
allow_empty = true
"#
    }

    /// Parse config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the text is not valid configuration.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            Error::Config(format!("Failed to parse '{}': {}", path.display(), e))
        })
    }

    /// Load `refpack.toml` from `dir`, creating it with defaults if missing.
    ///
    /// An existing file is never overwritten, even one created concurrently.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written, read or parsed.
    pub fn load_or_create(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(Self::default_toml().as_bytes())?;
                tracing::info!(path = %path.display(), "Wrote default refpack config");
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
            Err(e) => return Err(e.into()),
        }
        Self::from_file(&path)
    }

    /// Serialize this config to TOML text.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::Config(e.to_string()))
    }
}
