//! Application configuration
//!
//! Loaded from a YAML file (`docsearch.yaml` by default). Every key is
//! optional; missing keys fall back to [`AppConfig::default`].

use crate::error::{DocSearchError, DocSearchResult};
use crate::translate::{Backoff, RetryPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "docsearch.yaml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub translation: TranslationConfig,
    pub export: ExportConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    pub source_lang: String,
    pub target_lang: String,
    pub endpoint: String,
    pub timeout_seconds: u64,
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
    pub exponential_backoff: bool,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            source_lang: "mr".to_string(),
            target_lang: "en".to_string(),
            endpoint: "https://translate.googleapis.com/translate_a/single".to_string(),
            timeout_seconds: 30,
            max_attempts: 3,
            retry_delay_ms: 2000,
            exponential_backoff: false,
        }
    }
}

impl TranslationConfig {
    /// Retry policy described by this section
    pub fn retry_policy(&self) -> RetryPolicy {
        let backoff = if self.exponential_backoff {
            Backoff::Exponential
        } else {
            Backoff::Fixed
        };
        RetryPolicy::new(
            self.max_attempts,
            Duration::from_millis(self.retry_delay_ms),
            backoff,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory receiving `translated_<name>` files
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> DocSearchResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DocSearchError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        serde_yaml::from_str(&content).map_err(|e| {
            DocSearchError::Config(format!("Invalid config {}: {}", path.display(), e))
        })
    }

    /// Load an explicit config file, or the default file if it exists.
    ///
    /// An explicit path that cannot be loaded is an error; a missing default
    /// file silently yields the defaults.
    pub fn load(path: Option<&Path>) -> DocSearchResult<Self> {
        match path {
            Some(p) => Self::load_from_file(p),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load_from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
