//! oncolens-common — configuration shared by the OncoLens crates.

pub mod config;

pub use config::{Config, EngineConfig, LoggingConfig, ServerConfig};
