//! Error handling for the storefront Rust client

use std::fmt;
use thiserror::Error;

/// Unified error type for the storefront Rust client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The backend answered with a non-success status code
    #[error("API error ({status}): {message}")]
    Api {
        /// The HTTP status code
        status: u16,
        /// The response body, if any
        message: String,
    },

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Cart state errors
    #[error("Cart error: {0}")]
    Cart(String),

    /// Durable local store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// General errors
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Create a new authentication error
    pub fn auth<T: fmt::Display>(msg: T) -> Self {
        Error::Auth(msg.to_string())
    }

    /// Create a new cart error
    pub fn cart<T: fmt::Display>(msg: T) -> Self {
        Error::Cart(msg.to_string())
    }

    /// Create a new storage error
    pub fn storage<T: fmt::Display>(msg: T) -> Self {
        Error::Storage(msg.to_string())
    }

    /// Create a new general error
    pub fn general<T: fmt::Display>(msg: T) -> Self {
        Error::General(msg.to_string())
    }

    /// Create a new API error from a status code and response body
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Error::Api {
            status,
            message: message.into(),
        }
    }
}
