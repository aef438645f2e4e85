//! SideShift v2 API client with a resilient request core, plus a small HTTP
//! proxy exposing every endpoint.
//!
//! ```no_run
//! use sideshift_client::{ClientConfig, SideshiftClient};
//!
//! # async fn run() -> sideshift_client::Result<()> {
//! let client = SideshiftClient::new(ClientConfig::new("secret", "account-id"))?;
//! let coins = client.get_coins().await?;
//! println!("{coins}");
//! # Ok(())
//! # }
//! ```

// Core
pub mod client;
pub mod config;
pub mod error;
pub mod resilience;

// Proxy surface
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use client::{RequestError, SideshiftClient};
pub use config::{ClientConfig, ProxyConfig, RetryConfig};
pub use error::{Result, SideshiftError};
pub use http::ProxyServer;
pub use lifecycle::Shutdown;
