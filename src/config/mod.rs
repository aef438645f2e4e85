//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML) / environment
//!     → loader.rs (parse, env overrides)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → ClientConfig shared via Arc by every request
//! ```
//!
//! # Design Decisions
//! - Config is immutable once a client is built
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::ConfigError;
pub use schema::{
    ClientConfig, ListenerConfig, LogFormat, ObservabilityConfig, ProxyConfig, RetryConfig,
    SecurityConfig, DEFAULT_BASE_URL, DEFAULT_COMMISSION_RATE,
};
pub use validation::ValidationError;
