//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration for the server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address, worker pool).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request decoder settings.
    pub parser: ParserConfig,

    /// Response compression settings.
    pub compression: CompressionConfig,

    /// File-backed route settings.
    pub files: FilesConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:4221").
    pub bind_address: String,

    /// Maximum connections served concurrently (worker pool size).
    pub pool_size: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:4221".to_string(),
            pool_size: 10,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Idle read timeout in seconds, applied to every socket read.
    pub idle_secs: u64,

    /// How long shutdown waits for active connections to finish.
    pub shutdown_grace_secs: u64,
}

impl TimeoutConfig {
    pub fn idle(&self) -> Duration {
        Duration::from_secs(self.idle_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            idle_secs: 30,
            shutdown_grace_secs: 5,
        }
    }
}

/// How the header block is split into lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineSplitting {
    /// `\r\n`, `\n\n`, `\r\r` and `\n` all end a line.
    #[default]
    Permissive,
    /// Only `\r\n` ends a line.
    Strict,
}

/// Request decoder settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Line boundary handling for the header block.
    pub line_splitting: LineSplitting,

    /// Maximum size of the request line plus headers in bytes.
    pub max_header_bytes: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            line_splitting: LineSplitting::Permissive,
            max_header_bytes: 64 * 1024,
        }
    }
}

/// Response compression settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CompressionConfig {
    /// Honour `Accept-Encoding: gzip`.
    pub enabled: bool,

    /// Gzip level, 0 (store) to 9 (best).
    pub level: u32,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: 6,
        }
    }
}

/// File-backed route settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FilesConfig {
    /// Root directory for `/files`. `None` disables file routes.
    pub directory: Option<PathBuf>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter (trace, debug, info, warn, error or a full directive).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
