//! Read-only, best-effort user lookup.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, instrument};

use super::{
    ClientFuture, Failure, RequestOutcome, UserLookup, dispatch, log_completion,
};
use crate::classify::Operation;
use crate::config::UserApiConfig;
use crate::model::User;
use crate::transport::{HttpTransport, ReqwestTransport, TransportRequest};
use crate::types::Username;
use crate::uri::{USERS_PATH, build_uri};

/// Looks users up at `{scheme}://{host}/users/{username}`.
///
/// Never fails: transport errors, unexpected statuses and undecodable bodies
/// are logged and reported as "no user found".
#[derive(Clone)]
pub struct UserLookupClient {
    transport: Arc<dyn HttpTransport>,
    scheme: String,
    host: String,
}

impl UserLookupClient {
    pub fn new(config: &UserApiConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            scheme: config.scheme.clone(),
            host: config.host.clone(),
        }
    }

    /// Build a client from the environment with a `reqwest` transport.
    pub fn from_env() -> anyhow::Result<Self> {
        let config = UserApiConfig::from_env()?;
        let transport = ReqwestTransport::new(config.timeout)?;
        Ok(Self::new(&config, Arc::new(transport)))
    }

    /// Look up `username`, returning `None` on any failure.
    #[instrument(skip_all, fields(username = %username))]
    pub async fn get_user(&self, username: &Username) -> Option<User> {
        info!("Requesting user information for username: {}", username);
        let started = Instant::now();

        let outcome = RequestOutcome::from(self.fetch(username).await);
        log_completion(Operation::GetUser, started, outcome.is_success());

        match outcome {
            RequestOutcome::Found(user) => Some(user),
            RequestOutcome::NotFound => None,
            RequestOutcome::Failure(failure) => {
                log_failure(&failure);
                None
            }
        }
    }

    /// Lookup clients cannot create users; this does nothing.
    pub fn create_user(&self, _user: &User) {}

    async fn fetch(&self, username: &Username) -> Result<Option<User>, Failure> {
        let uri = build_uri(&self.scheme, &self.host, USERS_PATH, Some(username.as_str()))
            .map_err(Failure::MalformedUri)?;

        dispatch(
            self.transport.as_ref(),
            TransportRequest::get(uri),
            Operation::GetUser,
        )
        .await
    }
}

fn log_failure(failure: &Failure) {
    match failure {
        Failure::MalformedUri(e) => error!(error = %e, "Error fetching user information"),
        Failure::Transport(e) => error!(error = %e, "Error fetching user information"),
        Failure::UnexpectedStatus { status, body } => {
            error!(status = status.as_u16(), body = %body, "Error fetching user information")
        }
        Failure::Decode(e) => error!(error = %e, "Error parsing user information"),
        Failure::Secret(e) => error!(error = %e, "Error fetching user information"),
    }
}

impl UserLookup for UserLookupClient {
    type Error = Infallible;

    fn get_user<'a>(
        &'a self,
        username: &'a Username,
    ) -> ClientFuture<'a, Result<Option<User>, Self::Error>> {
        Box::pin(async move { Ok(UserLookupClient::get_user(self, username).await) })
    }
}
