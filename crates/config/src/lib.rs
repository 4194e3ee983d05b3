//! Configuration loading, validation, and management for quizgen.
//!
//! Loads configuration from `~/.quizgen/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.quizgen/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Shared context retrieval
    #[serde(default)]
    pub context: ContextConfig,

    /// Allocation and fan-out limits
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Audit side channel
    #[serde(default)]
    pub audit: AuditConfig,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins. `["*"]` allows any origin.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    /// Maximum accepted request body, in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    8000
}
fn default_allowed_origins() -> Vec<String> {
    vec!["*".into()]
}
fn default_max_body_bytes() -> usize {
    1024 * 1024
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: default_allowed_origins(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

/// Which context backend to use and how much text it may hand to workers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// "search", "file" or "static"
    #[serde(default = "default_context_backend")]
    pub backend: String,

    /// Cap on retrieved content before summarizing (characters).
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// Cap on the summary shared with workers (characters).
    #[serde(default = "default_summary_chars")]
    pub summary_chars: usize,

    /// Directory of `{locator}.txt` files for the "file" backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_dir: Option<String>,

    /// Fixed text for the "static" backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_text: Option<String>,

    #[serde(default)]
    pub search: SearchConfig,
}

fn default_context_backend() -> String {
    "search".into()
}
fn default_max_chars() -> usize {
    100_000
}
fn default_summary_chars() -> usize {
    2_000
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            backend: default_context_backend(),
            max_chars: default_max_chars(),
            summary_chars: default_summary_chars(),
            file_dir: None,
            static_text: None,
            search: SearchConfig::default(),
        }
    }
}

/// Connection settings for an OpenSearch-compatible index.
#[derive(Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_search_index")]
    pub index: String,

    /// Sent as an `ApiKey` authorization header when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Maximum number of chunks fetched per chapter.
    #[serde(default = "default_max_chunks")]
    pub max_chunks: usize,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Probe the index for the chapter title key before querying.
    #[serde(default = "default_true")]
    pub detect_chapter_key: bool,
}

fn default_search_endpoint() -> String {
    "http://localhost:9200".into()
}
fn default_search_index() -> String {
    "chunks".into()
}
fn default_max_chunks() -> usize {
    200
}
fn default_timeout_secs() -> u64 {
    30
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: default_search_endpoint(),
            index: default_search_index(),
            api_key: None,
            max_chunks: default_max_chunks(),
            timeout_secs: default_timeout_secs(),
            detect_chapter_key: true,
        }
    }
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("endpoint", &self.endpoint)
            .field("index", &self.index)
            .field("api_key", &redact(&self.api_key))
            .field("max_chunks", &self.max_chunks)
            .field("timeout_secs", &self.timeout_secs)
            .field("detect_chapter_key", &self.detect_chapter_key)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Largest `totalCount` a single request may ask for.
    #[serde(default = "default_max_total_items")]
    pub max_total_items: usize,

    /// Upper bound on concurrently running per-kind workers.
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
}

fn default_max_total_items() -> usize {
    500
}
fn default_max_workers() -> usize {
    3
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_total_items: default_max_total_items(),
            max_workers: default_max_workers(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// "jsonl", "tracing" or "none"
    #[serde(default = "default_audit_backend")]
    pub backend: String,

    /// JSONL file path; defaults to `~/.quizgen/audit/audit.jsonl`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

fn default_audit_backend() -> String {
    "jsonl".into()
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            backend: default_audit_backend(),
            path: None,
        }
    }
}

impl AuditConfig {
    /// Resolved JSONL path.
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| AppConfig::config_dir().join("audit").join("audit.jsonl"))
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.quizgen/config.toml).
    ///
    /// Environment variables override file values:
    /// - `QUIZGEN_HOST`, `QUIZGEN_PORT`
    /// - `QUIZGEN_CONTEXT_BACKEND`
    /// - `QUIZGEN_SEARCH_ENDPOINT`, `QUIZGEN_SEARCH_INDEX`, `QUIZGEN_SEARCH_API_KEY`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup, then re-validate.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("QUIZGEN_HOST") {
            self.gateway.host = host;
        }
        if let Some(port) = lookup("QUIZGEN_PORT") {
            self.gateway.port = port.parse().map_err(|_| {
                ConfigError::ValidationError(format!("QUIZGEN_PORT is not a port: {port}"))
            })?;
        }
        if let Some(backend) = lookup("QUIZGEN_CONTEXT_BACKEND") {
            self.context.backend = backend;
        }
        if let Some(endpoint) = lookup("QUIZGEN_SEARCH_ENDPOINT") {
            self.context.search.endpoint = endpoint;
        }
        if let Some(index) = lookup("QUIZGEN_SEARCH_INDEX") {
            self.context.search.index = index;
        }
        if let Some(key) = lookup("QUIZGEN_SEARCH_API_KEY") {
            self.context.search.api_key = Some(key);
        }
        self.validate()
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".quizgen")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.context.backend.as_str(), "search" | "file" | "static") {
            return Err(ConfigError::ValidationError(format!(
                "context.backend must be one of search, file, static (got '{}')",
                self.context.backend
            )));
        }

        if self.context.backend == "file" && self.context.file_dir.is_none() {
            return Err(ConfigError::ValidationError(
                "context.file_dir is required for the file backend".into(),
            ));
        }

        if self.context.max_chars == 0 || self.context.summary_chars == 0 {
            return Err(ConfigError::ValidationError(
                "context.max_chars and context.summary_chars must be > 0".into(),
            ));
        }

        if self.generation.max_total_items == 0 {
            return Err(ConfigError::ValidationError(
                "generation.max_total_items must be > 0".into(),
            ));
        }

        if self.generation.max_workers == 0 {
            return Err(ConfigError::ValidationError(
                "generation.max_workers must be > 0".into(),
            ));
        }

        if !matches!(self.audit.backend.as_str(), "jsonl" | "tracing" | "none") {
            return Err(ConfigError::ValidationError(format!(
                "audit.backend must be one of jsonl, tracing, none (got '{}')",
                self.audit.backend
            )));
        }

        Ok(())
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
