//! Client for looking up and provisioning users in the user service.
//!
//! Used from identity-provider authentication triggers to enrich a login with
//! the user's institution and roles, and to create the user when it does not
//! exist yet.
//!
//! ## Usage
//!
//! ```ignore
//! // Best-effort enrichment: never fails, `None` on any problem.
//! let lookup = UserLookupClient::from_env()?;
//! let user = lookup.get_user(&Username::new("alice@example.org")).await;
//!
//! // Strict client that can also create users.
//! let management = UserManagementClient::from_env(Arc::new(EnvSecretStore::new()))?;
//! let user = match management.get_user(&username).await? {
//!     Some(user) => user,
//!     None => management.create_user(&new_user).await?,
//! };
//! ```

mod classify;
mod client;
mod codec;
mod config;
mod credentials;
mod error;
mod model;
mod secrets;
mod transport;
mod types;
mod uri;

pub use classify::{Classified, Operation, classify};
pub use client::{
    ClientFuture, Failure, RequestOutcome, UserLookup, UserLookupClient, UserManagementClient,
    UserProvisioning,
};
pub use codec::{decode_user, encode_user};
pub use config::{
    ManagementConfig, USER_API_HOST, USER_API_SCHEME, USER_API_TIMEOUT_SECONDS,
    USER_SERVICE_SECRET_KEY, USER_SERVICE_SECRET_NAME, UserApiConfig,
};
pub use credentials::{Credential, CredentialProvider, SecretLocation};
pub use error::{DecodeError, SecretError, TransportError, UriError, UserApiError, UserApiResult};
pub use model::{Role, User, UserAttributes};
pub use secrets::{EnvSecretStore, SecretFuture, SecretStore, StaticSecretStore};
pub use transport::{
    DEFAULT_TIMEOUT, HttpTransport, ReqwestTransport, TransportFuture, TransportRequest,
    TransportResponse,
};
pub use types::{InstitutionId, RoleName, SecretKey, SecretName, Username};
pub use uri::{SERVICE_USERS_PATH, USERS_PATH, build_uri};
