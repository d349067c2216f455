use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration of a [`FlatFile`](crate::FlatFile) engine.
///
/// Deserializable from any serde format, so it can sit in an application's own
/// configuration file:
///
/// ```
/// # use seam_flatfile::Config;
/// let config: Config = serde_json::from_str(r#"{ "path": "bot.json" }"#).unwrap();
/// assert!(config.create_if_missing);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// File holding the database. `None` keeps everything in memory and commits
    /// never touch the disk.
    pub path: Option<PathBuf>,
    /// Start from an empty database when `path` doesn't exist yet.
    pub create_if_missing: bool,
    /// Write indented JSON.
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: None,
            create_if_missing: true,
            pretty: false,
        }
    }
}

impl Config {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
