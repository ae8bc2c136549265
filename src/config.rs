//! Configuration management for chatlist
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use anyhow::Context;
use crate::error::{ChatListError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for chatlist
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where conversation records come from
    #[serde(default)]
    pub source: SourceConfig,
    /// Conversation list behavior
    #[serde(default)]
    pub list: ListConfig,
    /// Logging output
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Record source configuration
///
/// Specifies which backend to fetch conversation records from and how
/// long a fetched list may be reused.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Type of source to use ("http" or "sqlite")
    #[serde(rename = "type", default = "default_source_type")]
    pub source_type: String,

    /// Seconds a fetched chat list is served from cache (0 disables caching)
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_seconds: u64,

    /// HTTP backend configuration
    #[serde(default)]
    pub http: HttpSourceConfig,

    /// Local message store configuration
    #[serde(default)]
    pub sqlite: SqliteSourceConfig,
}

fn default_source_type() -> String {
    "sqlite".to_string()
}

fn default_cache_ttl() -> u64 {
    300
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            source_type: default_source_type(),
            cache_ttl_seconds: default_cache_ttl(),
            http: HttpSourceConfig::default(),
            sqlite: SqliteSourceConfig::default(),
        }
    }
}

/// HTTP backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSourceConfig {
    /// Base URL of the messaging backend; the chat list lives at `/api/chats`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout (seconds)
    #[serde(default = "default_http_timeout")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:34115".to_string()
}

fn default_http_timeout() -> u64 {
    30
}

impl Default for HttpSourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_http_timeout(),
        }
    }
}

/// Local message store configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SqliteSourceConfig {
    /// Database path; `None` uses the user's data directory
    #[serde(default)]
    pub path: Option<String>,
}

/// How completions of overlapping loads are applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPolicy {
    /// Only the most recently requested load may update the list
    #[default]
    LatestRequest,
    /// Every completion is applied in arrival order
    LastCompletion,
}

impl std::str::FromStr for LoadPolicy {
    type Err = ChatListError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "latest_request" => Ok(LoadPolicy::LatestRequest),
            "last_completion" => Ok(LoadPolicy::LastCompletion),
            other => Err(ChatListError::Config(format!(
                "Invalid load policy: {}. Must be one of: latest_request, last_completion",
                other
            ))),
        }
    }
}

/// Conversation list configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    /// Handle suffix that marks a group conversation
    #[serde(default = "default_group_suffix")]
    pub group_suffix: String,

    /// Policy for overlapping loads
    #[serde(default)]
    pub load_policy: LoadPolicy,
}

fn default_group_suffix() -> String {
    crate::conversation::GROUP_SUFFIX.to_string()
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            group_suffix: default_group_suffix(),
            load_policy: LoadPolicy::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json_format: bool,

    /// Optional file that receives a copy of every log line
    #[serde(default)]
    pub file_path: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
            file_path: None,
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(ChatListError::from)
            .with_context(|| format!("Failed to read config file {}", path))?;
        let config = serde_yaml::from_str(&contents)
            .map_err(ChatListError::from)
            .with_context(|| format!("Failed to parse config file {}", path))?;
        Ok(config)
    }

    fn apply_env_vars(&mut self) {
        if let Ok(source_type) = std::env::var("CHATLIST_SOURCE") {
            self.source.source_type = source_type;
        }

        if let Ok(base_url) = std::env::var("CHATLIST_HTTP_BASE_URL") {
            self.source.http.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("CHATLIST_HTTP_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.source.http.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid CHATLIST_HTTP_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(ttl) = std::env::var("CHATLIST_CACHE_TTL_SECONDS") {
            if let Ok(value) = ttl.parse() {
                self.source.cache_ttl_seconds = value;
            } else {
                tracing::warn!("Invalid CHATLIST_CACHE_TTL_SECONDS: {}", ttl);
            }
        }

        if let Ok(suffix) = std::env::var("CHATLIST_GROUP_SUFFIX") {
            self.list.group_suffix = suffix;
        }

        if let Ok(policy) = std::env::var("CHATLIST_LOAD_POLICY") {
            match policy.parse() {
                Ok(value) => self.list.load_policy = value,
                Err(e) => tracing::warn!("Invalid CHATLIST_LOAD_POLICY: {}", e),
            }
        }

        if let Ok(level) = std::env::var("CHATLIST_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Ok(json_logs) = std::env::var("CHATLIST_JSON_LOGS") {
            self.logging.json_format = matches!(json_logs.to_lowercase().as_str(), "1" | "true");
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            self.logging.level = "debug".to_string();
        }

        if let Some(db_path) = &cli.db_path {
            self.source.sqlite.path = Some(db_path.clone());
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        let valid_sources = ["http", "sqlite"];
        if !valid_sources.contains(&self.source.source_type.as_str()) {
            return Err(ChatListError::Config(format!(
                "Invalid source type: {}. Must be one of: {}",
                self.source.source_type,
                valid_sources.join(", ")
            ))
            .into());
        }

        if self.source.source_type == "http" {
            let base_url = &self.source.http.base_url;
            if base_url.is_empty() {
                return Err(ChatListError::Config(
                    "source.http.base_url cannot be empty".to_string(),
                )
                .into());
            }
            if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                return Err(ChatListError::Config(format!(
                    "source.http.base_url must start with http:// or https://: {}",
                    base_url
                ))
                .into());
            }
        }

        if self.source.http.timeout_seconds == 0 {
            return Err(ChatListError::Config(
                "source.http.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.list.group_suffix.is_empty() {
            return Err(
                ChatListError::Config("list.group_suffix cannot be empty".to_string()).into(),
            );
        }

        Ok(())
    }
}
