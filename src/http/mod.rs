//! HTTP proxy surface.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum router, request id, trace span, body limit)
//!     → routes.rs (extract params/body, call SideshiftClient)
//!     → response.rs (JSON passthrough, or {error, details} with 400/500)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod routes;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use response::ApiError;
pub use routes::AppState;
pub use server::ProxyServer;
