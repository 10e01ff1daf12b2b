//! Error types for the backend collaborators.

use thiserror::Error;

/// Assistant text shown when the backend could not be reached.
pub const NETWORK_ERROR_REPLY: &str = "Network error.";

/// Assistant text shown when the backend answered with an error.
pub const SERVER_ERROR_REPLY: &str = "Server error talking to model.";

/// Errors raised by transport and history collaborators.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never got a response (connect, timeout, reset).
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("server returned {status}: {body}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),

    /// The request could not be built from the given input.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid configuration or unsupported values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// URL parse error.
    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Whether the failure happened before any response arrived.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Fixed assistant text standing in for a failed reply.
    #[must_use]
    pub const fn fallback_reply(&self) -> &'static str {
        if self.is_network() {
            NETWORK_ERROR_REPLY
        } else {
            SERVER_ERROR_REPLY
        }
    }
}

impl From<reqwest::Error> for ClientError {
    /// Requests reqwest refused to build (bad header value, bad URL) never
    /// left the client, so they are not network failures.
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::InvalidRequest(err.to_string())
        } else {
            Self::Network(err)
        }
    }
}

/// Convenience result alias for collaborator operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_errors_map_to_server_reply() {
        let err = ClientError::Server {
            status: 500,
            body: "boom".to_string(),
        };
        assert!(!err.is_network());
        assert_eq!(err.fallback_reply(), SERVER_ERROR_REPLY);
        assert_eq!(
            ClientError::Decode("bad json".to_string()).fallback_reply(),
            SERVER_ERROR_REPLY
        );
    }

    #[test]
    fn test_builder_errors_are_invalid_requests() {
        let err = reqwest::Client::new()
            .get("not a url")
            .build()
            .unwrap_err();
        assert!(err.is_builder());

        let err = ClientError::from(err);
        assert!(matches!(err, ClientError::InvalidRequest(_)));
        assert!(!err.is_network());
        assert_eq!(err.fallback_reply(), SERVER_ERROR_REPLY);
    }
}
