//! Errors reported by [`crate::UserGateway`] implementations.

use thiserror::Error;

/// Failure of a call to the user service.
///
/// Only a login conflict gets its own variant; the form shows one generic
/// message for everything else.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The login is held by another user (HTTP 409).
    #[error("login is already taken")]
    Conflict,

    /// Any other transport, status, or decoding failure.
    #[error("user service request failed: {message}")]
    Other {
        /// Description of the failure.
        message: String,
    },
}

impl GatewayError {
    /// Create an [`GatewayError::Other`] with the given message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}
