//! Matrix API error types.

use thiserror::Error;

/// Failures talking to the homeserver.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum MatrixError {
    #[error("invalid request URL: {message}")]
    InvalidUrl { message: String },

    #[error("network error: {message}")]
    Network { message: String },

    #[error("failed to decode response: {message}")]
    Decode { message: String },

    #[error("rate limited with no retry time given")]
    RateLimitedWithoutRetry,

    #[error("server returned {errcode}{}: {message}", status_suffix(.status))]
    Server {
        status: Option<u16>,
        errcode: String,
        message: String,
    },
}

#[allow(clippy::ref_option)]
fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

impl MatrixError {
    /// Creates invalid URL error.
    #[must_use]
    pub fn invalid_url(message: impl Into<String>) -> Self {
        Self::InvalidUrl {
            message: message.into(),
        }
    }

    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates server error from a Matrix error code.
    #[must_use]
    pub fn server(status: Option<u16>, errcode: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            errcode: errcode.into(),
            message: message.into(),
        }
    }

    /// Returns the Matrix error code, if the server sent one.
    #[must_use]
    pub fn errcode(&self) -> Option<&str> {
        match self {
            Self::Server { errcode, .. } => Some(errcode),
            _ => None,
        }
    }

    /// Returns whether error is a rate limit the client could not wait out.
    #[must_use]
    pub const fn is_rate_limit(&self) -> bool {
        matches!(self, Self::RateLimitedWithoutRetry)
    }

    /// Returns whether error is network related.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_display() {
        let err = MatrixError::server(Some(403), "M_FORBIDDEN", "not allowed");
        assert_eq!(err.to_string(), "server returned M_FORBIDDEN (HTTP 403): not allowed");

        let err = MatrixError::server(None, "M_TOO_LARGE", "");
        assert_eq!(err.to_string(), "server returned M_TOO_LARGE: ");
        assert_eq!(err.errcode(), Some("M_TOO_LARGE"));
    }

    #[test]
    fn test_classification() {
        assert!(MatrixError::RateLimitedWithoutRetry.is_rate_limit());
        assert!(MatrixError::network("timed out").is_network_error());
        assert!(!MatrixError::decode("eof").is_network_error());
    }
}
