//! Crate-level error type.

use thiserror::Error;

use crate::client::error::RequestError;
use crate::config::ConfigError;

/// Everything a client call or client construction can fail with.
#[derive(Debug, Error)]
pub enum SideshiftError {
    /// An argument was rejected before any request was sent.
    #[error("{0}")]
    Validation(String),

    /// The request was sent and failed for good.
    #[error(transparent)]
    Request(#[from] Box<RequestError>),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl From<RequestError> for SideshiftError {
    fn from(err: RequestError) -> Self {
        if err.is_validation() {
            SideshiftError::Validation(err.message)
        } else {
            SideshiftError::Request(Box::new(err))
        }
    }
}

impl SideshiftError {
    /// HTTP status of the failed request, if the service answered.
    pub fn status(&self) -> Option<u16> {
        self.as_request().and_then(|err| err.status)
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, SideshiftError::Validation(_))
    }

    pub fn as_request(&self) -> Option<&RequestError> {
        match self {
            SideshiftError::Request(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SideshiftError>;
