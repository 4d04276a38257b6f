//! User service clients.
//!
//! Two clients share one request pipeline:
//!
//! - [`UserLookupClient`]: read-only, best-effort. Every failure degrades to
//!   "no user found".
//! - [`UserManagementClient`]: read and write. Anything other than a clean
//!   `200` (or `404` on lookup) is raised as a [`UserApiError`].
//!
//! The pipeline is URI build → send → classify → decode, each stage
//! short-circuiting into a [`Failure`]. The two clients differ only in how
//! they map the resulting [`RequestOutcome`] onto their public contract.

mod lookup;
mod management;

#[cfg(test)]
mod test_support;

pub use lookup::UserLookupClient;
pub use management::UserManagementClient;

use std::future::Future;
use std::pin::Pin;
use std::time::Instant;

use http::StatusCode;
use tracing::info;

use crate::classify::{Classified, Operation, classify};
use crate::codec::decode_user;
use crate::error::{DecodeError, SecretError, TransportError, UriError, UserApiError};
use crate::model::User;
use crate::transport::{HttpTransport, TransportRequest};
use crate::types::Username;

/// Boxed future returned by client capability methods.
pub type ClientFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Capability to look a user up by username.
pub trait UserLookup: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch a user; `Ok(None)` means the service has no such user.
    fn get_user<'a>(&'a self, username: &'a Username)
    -> ClientFuture<'a, Result<Option<User>, Self::Error>>;
}

/// Capability to create users. Only the management client has it.
pub trait UserProvisioning: UserLookup {
    /// Create a user and return the stored representation.
    fn create_user<'a>(&'a self, user: &'a User) -> ClientFuture<'a, Result<User, Self::Error>>;
}

/// Why a request did not produce a user.
#[derive(Debug)]
pub enum Failure {
    MalformedUri(UriError),
    Transport(TransportError),
    UnexpectedStatus { status: StatusCode, body: String },
    Decode(DecodeError),
    Secret(SecretError),
}

impl Failure {
    /// Whether the response was fetched and accepted before failing.
    ///
    /// Decode failures happen after a `200`, so timing for them is reported
    /// as a success.
    fn response_accepted(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    /// Map to the management client's error, logging it first.
    fn into_api_error(self, operation: Operation) -> UserApiError {
        let prefix = operation.failure_message();
        let err = match self {
            Self::MalformedUri(e) => UserApiError::MalformedUri(e),
            Self::Transport(e) => UserApiError::BadGateway {
                message: format!("{prefix}: {e}"),
                status: None,
                body: None,
                source: Some(e),
            },
            Self::UnexpectedStatus { status, body } => UserApiError::BadGateway {
                message: format!(
                    "{prefix}\nStatus Code:{}\nResponse message:{body}",
                    status.as_u16()
                ),
                status: Some(status),
                body: Some(body),
                source: None,
            },
            Self::Decode(e) => UserApiError::UserCannotBeParsed(e),
            Self::Secret(e) => UserApiError::Secret(e),
        };

        match &err {
            UserApiError::UserCannotBeParsed(cause) => {
                tracing::error!(operation = %operation, error = %cause, "Error parsing user information");
            }
            other => {
                tracing::error!(operation = %operation, error = %other, "{prefix}");
            }
        }
        err
    }
}

/// Result of running one request through the pipeline.
#[derive(Debug)]
pub enum RequestOutcome {
    Found(User),
    NotFound,
    Failure(Failure),
}

impl RequestOutcome {
    /// Whether the completion log should report success.
    fn is_success(&self) -> bool {
        match self {
            Self::Found(_) | Self::NotFound => true,
            Self::Failure(failure) => failure.response_accepted(),
        }
    }
}

impl From<Result<Option<User>, Failure>> for RequestOutcome {
    fn from(result: Result<Option<User>, Failure>) -> Self {
        match result {
            Ok(Some(user)) => Self::Found(user),
            Ok(None) => Self::NotFound,
            Err(failure) => Self::Failure(failure),
        }
    }
}

/// Send → classify → decode.
async fn dispatch(
    transport: &dyn HttpTransport,
    request: TransportRequest,
    operation: Operation,
) -> Result<Option<User>, Failure> {
    let response = transport.send(request).await.map_err(Failure::Transport)?;

    match classify(response, operation) {
        Classified::Success(body) => decode_user(body.as_bytes())
            .map(Some)
            .map_err(Failure::Decode),
        Classified::NotFound => Ok(None),
        Classified::UnexpectedFailure { status, body } => {
            Err(Failure::UnexpectedStatus { status, body })
        }
    }
}

/// Log the completion line every public operation emits.
fn log_completion(operation: Operation, started: Instant, success: bool) {
    let elapsed_ms = started.elapsed().as_millis() as u64;
    if success {
        info!(operation = %operation, elapsed_ms, "{operation} success took {elapsed_ms} ms");
    } else {
        info!(operation = %operation, elapsed_ms, "{operation} failure took {elapsed_ms} ms");
    }
}
