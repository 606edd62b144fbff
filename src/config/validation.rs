//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (pool sizes ≥ 1, finite timeouts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Pure function: `ServerConfig → Result<(), Vec<ValidationError>>`
//! - Runs before the config is accepted into the system

use std::net::IpAddr;

use thiserror::Error;

use crate::config::schema::ServerConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("pool.workers must be at least 1")]
    NoWorkers,
    #[error("pool.threads_per_worker must be at least 1")]
    NoThreadSlots,
    #[error("listener.bind_host is not an IP address: {0:?}")]
    InvalidBindHost(String),
    #[error("timeouts.request_secs must be omitted (unbounded) or greater than 0")]
    ZeroTimeout,
}

/// Check every semantic constraint, collecting all violations.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.pool.workers == 0 {
        errors.push(ValidationError::NoWorkers);
    }
    if config.pool.threads_per_worker == 0 {
        errors.push(ValidationError::NoThreadSlots);
    }
    if config.listener.bind_host.parse::<IpAddr>().is_err() {
        errors.push(ValidationError::InvalidBindHost(
            config.listener.bind_host.clone(),
        ));
    }
    if config.timeouts.request_secs == Some(0) {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
