//! Error taxonomy shared by every layer.

use thiserror::Error;

/// Errors raised by the ZEI bridge
#[derive(Debug, Error)]
pub enum ZeiError {
    /// Bad API credentials or a sign-in response we could not use
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Non-2xx response from the remote tracking API
    #[error("ZEI API response status {status}")]
    Api { status: u16 },

    /// Network or connection failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Remote payload did not have the expected shape
    #[error("malformed response: {0}")]
    Decode(String),

    /// BLE read/subscribe/discovery failure
    #[error("device error: {0}")]
    Device(String),

    /// Unresolvable side or activity lookup
    #[error("not found: {0}")]
    NotFound(String),

    /// Missing or invalid configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl ZeiError {
    /// Twirp-style error code used on the local RPC wire
    pub fn code(&self) -> &'static str {
        match self {
            Self::Auth(_) => "unauthenticated",
            Self::Api { status } if *status == 404 => "not_found",
            Self::Api { .. } | Self::Decode(_) => "internal",
            Self::Transport(_) | Self::Device(_) => "unavailable",
            Self::NotFound(_) => "not_found",
            Self::Config(_) => "invalid_argument",
        }
    }
}

pub type Result<T> = std::result::Result<T, ZeiError>;
