//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → CLI flags and PORT env override per-field
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so a bare `PORT=8080 gantry` works
//! - The listen port is the one setting with no default: CLI flag, then
//!   `PORT` env, then config file; absence everywhere is fatal
//! - "No timeout" is a distinguished value (`Option::None`), never a
//!   magic number

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, resolve_port, ConfigError};
pub use schema::{ListenerConfig, ObservabilityConfig, PoolConfig, ServerConfig, TimeoutConfig};
