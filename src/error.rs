//! Error types for the user API clients.

use http::StatusCode;
use thiserror::Error;

/// A request URI could not be built from the configured scheme and host.
#[derive(Debug, Error)]
pub enum UriError {
    #[error("URI scheme is empty")]
    EmptyScheme,

    #[error("URI host is empty")]
    EmptyHost,

    /// Path segment is empty, a dot-segment, or contains a delimiter.
    #[error("invalid path segment `{0}`")]
    InvalidSegment(String),

    #[error("invalid URI `{uri}`: {source}")]
    Invalid {
        uri: String,
        #[source]
        source: url::ParseError,
    },
}

/// The HTTP round trip itself did not complete.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Connection could not be established or was interrupted.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),

    /// HTTP client could not be configured.
    #[error("failed to create HTTP client: {0}")]
    Client(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_body() || err.is_decode() {
            Self::Body(err.to_string())
        } else if err.is_builder() {
            Self::Client(err.to_string())
        } else {
            Self::Connection(err.to_string())
        }
    }
}

/// A response body did not match the user schema.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed user payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("user payload is missing required field `{0}`")]
    MissingField(&'static str),
}

/// The credential for write requests could not be resolved.
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("secret not found: {0}")]
    NotFound(String),

    #[error("key `{key}` not found in secret `{name}`")]
    KeyNotFound { name: String, key: String },

    #[error("secret `{name}` is malformed: {reason}")]
    Malformed { name: String, reason: String },

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("credential from secret `{0}` is not a valid header value")]
    InvalidHeaderValue(String),
}

/// Errors raised by the management client.
#[derive(Debug, Error)]
pub enum UserApiError {
    #[error("malformed user API URI: {0}")]
    MalformedUri(#[from] UriError),

    /// The user service failed, or could not be reached.
    #[error("{message}")]
    BadGateway {
        message: String,
        status: Option<StatusCode>,
        body: Option<String>,
        #[source]
        source: Option<TransportError>,
    },

    #[error("User cannot be parsed")]
    UserCannotBeParsed(#[source] DecodeError),

    #[error("could not resolve user service credential: {0}")]
    Secret(#[from] SecretError),
}

impl UserApiError {
    /// Upstream status code, when the service answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::BadGateway { status, .. } => *status,
            _ => None,
        }
    }

    /// Raw upstream response body, when the service answered at all.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::BadGateway { body, .. } => body.as_deref(),
            _ => None,
        }
    }

    pub fn is_bad_gateway(&self) -> bool {
        matches!(self, Self::BadGateway { .. })
    }
}

/// Result type for management client operations.
pub type UserApiResult<T> = Result<T, UserApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(UriError::EmptyHost.to_string(), "URI host is empty");

        let err = SecretError::KeyNotFound {
            name: "user-service".to_string(),
            key: "token".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "key `token` not found in secret `user-service`"
        );

        let err = DecodeError::MissingField("username");
        assert_eq!(
            err.to_string(),
            "user payload is missing required field `username`"
        );
    }

    #[test]
    fn test_bad_gateway_accessors() {
        let err = UserApiError::BadGateway {
            message: "Could not fetch user".to_string(),
            status: Some(StatusCode::INTERNAL_SERVER_ERROR),
            body: Some("boom".to_string()),
            source: None,
        };

        assert!(err.is_bad_gateway());
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(err.body(), Some("boom"));
        assert_eq!(err.to_string(), "Could not fetch user");
    }

    #[test]
    fn test_secret_error_converts() {
        let err: UserApiError = SecretError::NotFound("user-service".to_string()).into();
        assert!(matches!(err, UserApiError::Secret(_)));
        assert_eq!(err.status(), None);
    }
}
