//! # chatwire-common
//!
//! Shared utilities including configuration, the client error taxonomy, and
//! telemetry setup.

pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{ClientConfig, ConfigError};
pub use error::{ClientError, ClientResult};
pub use telemetry::{init_tracing, try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError};
