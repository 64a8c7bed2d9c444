//! Configuration loading for OncoLens.
//! Reads oncolens.toml from the current directory or the path in ONCOLENS_CONFIG.
//! Every field has a default, so a missing file means a default configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "ONCOLENS_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "oncolens.toml";

const KNOWN_MODELS: &[&str] = &["biobert", "clinicalbert", "pubmedbert"];

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "bool_true")]
    pub permissive_cors: bool,
    /// Capacity of the SSE broadcast channel.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

fn default_host()         -> String { "127.0.0.1".to_string() }
fn default_port()         -> u16    { 3001 }
fn bool_true()            -> bool   { true }
fn default_event_buffer() -> usize  { 256 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            permissive_cors: bool_true(),
            event_buffer: default_event_buffer(),
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Longest accepted input, in characters.
    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,
    #[serde(default = "default_threshold")]
    pub default_threshold: f64,
    #[serde(default = "default_model")]
    pub default_model: String,
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
}

fn default_max_text_length() -> usize  { 100_000 }
fn default_threshold()       -> f64    { 0.5 }
fn default_model()           -> String { "BioBERT".to_string() }
fn default_max_batch_size()  -> usize  { 64 }

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_text_length: default_max_text_length(),
            default_threshold: default_threshold(),
            default_model: default_model(),
            max_batch_size: default_max_batch_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when RUST_LOG is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String { "oncolens=debug,info".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: default_log_filter() }
    }
}

impl Config {
    /// Load configuration from oncolens.toml.
    /// Checks ONCOLENS_CONFIG first, then the current directory.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Self::config_path())
    }

    /// `$ONCOLENS_CONFIG` if set, else `./oncolens.toml`.
    pub fn config_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// A missing file yields the defaults; an unreadable or invalid one is an error.
    pub fn load_from(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {}", path.display(), e))?;
        tracing::info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("server.port must be non-zero");
        }
        if self.engine.max_text_length == 0 {
            anyhow::bail!("engine.max_text_length must be non-zero");
        }
        if self.engine.max_batch_size == 0 {
            anyhow::bail!("engine.max_batch_size must be non-zero");
        }
        let model_key: String = self
            .engine
            .default_model
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_lowercase();
        if !KNOWN_MODELS.contains(&model_key.as_str()) {
            anyhow::bail!("engine.default_model '{}' is not a known model", self.engine.default_model);
        }
        Ok(())
    }
}
