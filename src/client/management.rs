//! Read/write user client with strict error surfacing.

use std::sync::Arc;
use std::time::Instant;

use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, StatusCode};
use tracing::{info, instrument};

use super::{
    ClientFuture, Failure, RequestOutcome, UserLookup, UserProvisioning, dispatch,
    log_completion,
};
use crate::classify::Operation;
use crate::codec::encode_user;
use crate::config::ManagementConfig;
use crate::credentials::CredentialProvider;
use crate::error::{UserApiError, UserApiResult};
use crate::model::User;
use crate::secrets::SecretStore;
use crate::transport::{HttpTransport, ReqwestTransport, TransportRequest};
use crate::types::Username;
use crate::uri::{SERVICE_USERS_PATH, build_uri};

/// Looks up and creates users under
/// `{scheme}://{host}/users-roles-internal/service/users`.
///
/// Creation requests carry an `Authorization` header resolved from the
/// secret store on every call.
#[derive(Clone)]
pub struct UserManagementClient {
    transport: Arc<dyn HttpTransport>,
    credentials: CredentialProvider,
    scheme: String,
    host: String,
}

impl UserManagementClient {
    pub fn new(
        config: &ManagementConfig,
        transport: Arc<dyn HttpTransport>,
        secret_store: Arc<dyn SecretStore>,
    ) -> Self {
        Self {
            transport,
            credentials: CredentialProvider::new(secret_store, config.secret.clone()),
            scheme: config.api.scheme.clone(),
            host: config.api.host.clone(),
        }
    }

    /// Build a client from the environment with a `reqwest` transport.
    pub fn from_env(secret_store: Arc<dyn SecretStore>) -> anyhow::Result<Self> {
        let config = ManagementConfig::from_env()?;
        let transport = ReqwestTransport::new(config.api.timeout)?;
        Ok(Self::new(&config, Arc::new(transport), secret_store))
    }

    /// Look up `username`.
    ///
    /// Returns `Ok(None)` on `404`. Any other non-`200` status, or a failed
    /// round trip, is a `BadGateway`; an undecodable `200` body is
    /// `UserCannotBeParsed`.
    #[instrument(skip_all, fields(username = %username))]
    pub async fn get_user(&self, username: &Username) -> UserApiResult<Option<User>> {
        info!("Requesting user information for username: {}", username);
        let started = Instant::now();

        let outcome = RequestOutcome::from(self.fetch(username).await);
        log_completion(Operation::GetUser, started, outcome.is_success());

        match outcome {
            RequestOutcome::Found(user) => Ok(Some(user)),
            RequestOutcome::NotFound => Ok(None),
            RequestOutcome::Failure(failure) => Err(failure.into_api_error(Operation::GetUser)),
        }
    }

    /// Create `user` and return the representation the service stored.
    ///
    /// The credential is resolved first; if that fails nothing is sent.
    #[instrument(skip_all, fields(username = %user.username()))]
    pub async fn create_user(&self, user: &User) -> UserApiResult<User> {
        info!("Requesting user creation for username: {}", user.username());
        let started = Instant::now();

        let result = self.submit(user).await;
        let success = result.as_ref().map_or_else(Failure::response_accepted, |_| true);
        log_completion(Operation::CreateUser, started, success);

        result.map_err(|failure| failure.into_api_error(Operation::CreateUser))
    }

    async fn fetch(&self, username: &Username) -> Result<Option<User>, Failure> {
        let uri = build_uri(
            &self.scheme,
            &self.host,
            SERVICE_USERS_PATH,
            Some(username.as_str()),
        )
        .map_err(Failure::MalformedUri)?;

        dispatch(
            self.transport.as_ref(),
            TransportRequest::get(uri),
            Operation::GetUser,
        )
        .await
    }

    async fn submit(&self, user: &User) -> Result<User, Failure> {
        let credential = self
            .credentials
            .fetch_credential()
            .await
            .map_err(Failure::Secret)?;
        let authorization = credential
            .header_value(&self.credentials.location().name)
            .map_err(Failure::Secret)?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let uri = build_uri(&self.scheme, &self.host, SERVICE_USERS_PATH, None)
            .map_err(Failure::MalformedUri)?;

        let created = dispatch(
            self.transport.as_ref(),
            TransportRequest::post(uri, headers, encode_user(user)),
            Operation::CreateUser,
        )
        .await?;

        // `classify` reports not-found only for lookups
        created.ok_or(Failure::UnexpectedStatus {
            status: StatusCode::NOT_FOUND,
            body: String::new(),
        })
    }
}

impl UserLookup for UserManagementClient {
    type Error = UserApiError;

    fn get_user<'a>(
        &'a self,
        username: &'a Username,
    ) -> ClientFuture<'a, Result<Option<User>, Self::Error>> {
        Box::pin(UserManagementClient::get_user(self, username))
    }
}

impl UserProvisioning for UserManagementClient {
    fn create_user<'a>(&'a self, user: &'a User) -> ClientFuture<'a, Result<User, Self::Error>> {
        Box::pin(UserManagementClient::create_user(self, user))
    }
}
