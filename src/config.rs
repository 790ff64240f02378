//! Configuration file parser for ~/.config/treenav/config.toml.
//!
//! The file is optional; a missing or blank file yields `Config::default()`.
//! Unknown keys are accepted but logged, since they are usually typos.
use crate::document::DEFAULT_DOCUMENT_URL;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

/// Application configuration. Every key is optional.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the navigation document is fetched from.
    pub document_url: String,

    /// Theme variant name ("dark" or "light").
    pub theme: String,

    /// Start in expand-all mode instead of collapse-all.
    pub start_expanded: bool,

    /// Fetch page headings when a node is activated.
    pub load_pages: bool,

    /// Number of loaded pages kept in memory.
    pub page_cache_size: usize,

    /// Keybinding overrides: action name to key string.
    pub keybindings: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            document_url: DEFAULT_DOCUMENT_URL.to_string(),
            theme: "dark".to_string(),
            start_expanded: false,
            load_pages: true,
            page_cache_size: 32,
            keybindings: HashMap::new(),
        }
    }
}

impl Config {
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 6] = [
        "document_url",
        "theme",
        "start_expanded",
        "load_pages",
        "page_cache_size",
        "keybindings",
    ];

    /// Default location: `$XDG_CONFIG_HOME/treenav/config.toml`, falling back
    /// to `~/.config/treenav/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .filter(|p| p.is_absolute())
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("treenav").join("config.toml"))
    }

    /// Load configuration from a TOML file.
    ///
    /// - Missing, empty or blank file → `Ok(Config::default())`
    /// - File over 1 MiB → `Err(ConfigError::TooLarge)`
    /// - Invalid TOML or wrong value types → `Err(ConfigError::Parse)`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            theme = %config.theme,
            document_url = %config.document_url,
            "Loaded configuration"
        );
        Ok(config)
    }
}
