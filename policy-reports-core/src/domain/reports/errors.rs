//! Report domain errors

use thiserror::Error;

/// Failure of a remote report fetch
///
/// Cloneable so that one failed fetch can be handed to every caller that is
/// waiting on the same cached request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// HTTP/network-level error (optional status code)
    #[error("gateway HTTP error: {message}, status={status:?}")]
    Http {
        message: String,
        status: Option<u16>,
    },

    /// The remote answered but the payload could not be understood
    #[error("gateway decode error: {0}")]
    Decode(String),

    /// Any other error condition
    #[error("gateway error: {0}")]
    Other(String),
}

impl GatewayError {
    pub fn http(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::Http {
            message: message.into(),
            status,
        }
    }
}
