//! Credential resolution for write requests to the user service.

use std::fmt;
use std::sync::Arc;

use http::HeaderValue;
use tracing::{debug, error};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::SecretError;
use crate::secrets::SecretStore;
use crate::types::{SecretKey, SecretName};

/// Opaque bearer value sent in the `Authorization` header.
///
/// Redacted in `Debug` output and wiped from memory on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Expose the raw value.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// The credential as a sensitive header value, unchanged.
    pub fn header_value(&self, secret_name: &SecretName) -> Result<HeaderValue, SecretError> {
        let mut value = HeaderValue::from_str(&self.0)
            .map_err(|_| SecretError::InvalidHeaderValue(secret_name.to_string()))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

/// Where the credential lives in the secret store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretLocation {
    pub name: SecretName,
    pub key: SecretKey,
}

impl SecretLocation {
    pub fn new(name: impl Into<SecretName>, key: impl Into<SecretKey>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
        }
    }
}

/// Resolves the credential for each creation request.
///
/// Nothing is cached: every call goes to the secret store.
#[derive(Clone)]
pub struct CredentialProvider {
    store: Arc<dyn SecretStore>,
    location: SecretLocation,
}

impl CredentialProvider {
    pub fn new(store: Arc<dyn SecretStore>, location: SecretLocation) -> Self {
        Self { store, location }
    }

    pub fn location(&self) -> &SecretLocation {
        &self.location
    }

    pub async fn fetch_credential(&self) -> Result<Credential, SecretError> {
        debug!(secret = %self.location.name, "Resolving user service credential");

        self.store
            .fetch_secret(self.location.name.as_str(), self.location.key.as_str())
            .await
            .map(Credential::new)
            .map_err(|e| {
                error!(secret = %self.location.name, error = %e, "Failed to resolve user service credential");
                e
            })
    }
}

impl fmt::Debug for CredentialProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialProvider")
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}
