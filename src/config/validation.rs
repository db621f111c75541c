//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (pool size, timeouts, compression level)
//! - Check the bind address parses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::ServerConfig;

/// Smallest header block that can hold a terminator.
const MIN_HEADER_BYTES: usize = 16;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    BindAddress(String),

    #[error("listener.pool_size must be at least 1")]
    EmptyPool,

    #[error("timeouts.idle_secs must be at least 1")]
    ZeroIdleTimeout,

    #[error("parser.max_header_bytes must be at least 16, got {0}")]
    HeaderLimit(usize),

    #[error("compression.level must be between 0 and 9, got {0}")]
    CompressionLevel(u32),
}

/// Check `config` and collect every violation.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.listener.pool_size == 0 {
        errors.push(ValidationError::EmptyPool);
    }
    if config.timeouts.idle_secs == 0 {
        errors.push(ValidationError::ZeroIdleTimeout);
    }
    if config.parser.max_header_bytes < MIN_HEADER_BYTES {
        errors.push(ValidationError::HeaderLimit(config.parser.max_header_bytes));
    }
    if config.compression.level > 9 {
        errors.push(ValidationError::CompressionLevel(config.compression.level));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
