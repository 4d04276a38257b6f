//! Secret store seam used to resolve the user service credential.
//!
//! A secret is addressed by name and holds a set of key/value pairs; callers
//! ask for one value. Two stores are provided:
//!
//! - [`StaticSecretStore`]: in-memory values, for tests and embedding
//! - [`EnvSecretStore`]: the secret name is an environment variable holding
//!   a JSON object, and the key selects one of its string fields

use std::collections::HashMap;
use std::env;
use std::future::Future;
use std::pin::Pin;

use serde_json::Value;
use tracing::debug;

use crate::error::SecretError;

/// Boxed future returned by [`SecretStore::fetch_secret`].
pub type SecretFuture<'a> = Pin<Box<dyn Future<Output = Result<String, SecretError>> + Send + 'a>>;

/// Reads one value out of a named secret.
pub trait SecretStore: Send + Sync {
    fn fetch_secret<'a>(&'a self, name: &'a str, key: &'a str) -> SecretFuture<'a>;
}

/// In-memory secret store.
#[derive(Debug, Clone, Default)]
pub struct StaticSecretStore {
    secrets: HashMap<String, HashMap<String, String>>,
}

impl StaticSecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value under `name`/`key`.
    pub fn with_secret(
        mut self,
        name: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.secrets
            .entry(name.into())
            .or_default()
            .insert(key.into(), value.into());
        self
    }

    fn lookup(&self, name: &str, key: &str) -> Result<String, SecretError> {
        let secret = self
            .secrets
            .get(name)
            .ok_or_else(|| SecretError::NotFound(name.to_string()))?;

        secret
            .get(key)
            .cloned()
            .ok_or_else(|| SecretError::KeyNotFound {
                name: name.to_string(),
                key: key.to_string(),
            })
    }
}

impl SecretStore for StaticSecretStore {
    fn fetch_secret<'a>(&'a self, name: &'a str, key: &'a str) -> SecretFuture<'a> {
        Box::pin(async move { self.lookup(name, key) })
    }
}

/// Secret store reading JSON secrets from environment variables.
///
/// `fetch_secret("USER_SERVICE_SECRET", "token")` reads the variable
/// `USER_SERVICE_SECRET`, parses it as a JSON object and returns its
/// `token` field.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecretStore;

impl EnvSecretStore {
    pub fn new() -> Self {
        Self
    }

    fn lookup(name: &str, key: &str) -> Result<String, SecretError> {
        debug!(secret = %name, "Reading secret from environment");

        let raw = env::var(name).map_err(|e| match e {
            env::VarError::NotPresent => SecretError::NotFound(name.to_string()),
            env::VarError::NotUnicode(_) => SecretError::Malformed {
                name: name.to_string(),
                reason: "value is not valid unicode".to_string(),
            },
        })?;

        extract_secret_value(name, &raw, key)
    }
}

impl SecretStore for EnvSecretStore {
    fn fetch_secret<'a>(&'a self, name: &'a str, key: &'a str) -> SecretFuture<'a> {
        Box::pin(async move { Self::lookup(name, key) })
    }
}

/// Pull the string field `key` out of a JSON-object secret.
fn extract_secret_value(name: &str, raw: &str, key: &str) -> Result<String, SecretError> {
    let parsed: Value = serde_json::from_str(raw).map_err(|e| SecretError::Malformed {
        name: name.to_string(),
        reason: e.to_string(),
    })?;

    let Value::Object(map) = parsed else {
        return Err(SecretError::Malformed {
            name: name.to_string(),
            reason: "expected a JSON object".to_string(),
        });
    };

    match map.get(key) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(SecretError::Malformed {
            name: name.to_string(),
            reason: format!("value of `{key}` is not a string"),
        }),
        None => Err(SecretError::KeyNotFound {
            name: name.to_string(),
            key: key.to_string(),
        }),
    }
}
