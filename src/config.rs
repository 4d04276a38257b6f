use std::{env, time::Duration};

use crate::credentials::SecretLocation;
use crate::transport::DEFAULT_TIMEOUT;

pub const USER_API_SCHEME: &str = "USER_API_SCHEME";
pub const USER_API_HOST: &str = "USER_API_HOST";
pub const USER_API_TIMEOUT_SECONDS: &str = "USER_API_TIMEOUT_SECONDS";
pub const USER_SERVICE_SECRET_NAME: &str = "USER_SERVICE_SECRET_NAME";
pub const USER_SERVICE_SECRET_KEY: &str = "USER_SERVICE_SECRET_KEY";

/// Where the user service lives, and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserApiConfig {
    pub scheme: String,
    pub host: String,
    pub timeout: Duration,
}

impl UserApiConfig {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read `USER_API_SCHEME`, `USER_API_HOST` and the optional
    /// `USER_API_TIMEOUT_SECONDS` from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let scheme = required(&lookup, USER_API_SCHEME)?;
        let host = required(&lookup, USER_API_HOST)?;

        let timeout = match optional(&lookup, USER_API_TIMEOUT_SECONDS) {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|e| {
                    anyhow::anyhow!("`{USER_API_TIMEOUT_SECONDS}` must be a whole number of seconds, got `{raw}`: {e}")
                })?;
                Duration::from_secs(secs)
            }
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            scheme,
            host,
            timeout,
        })
    }
}

/// Configuration of the management client: the service location plus the
/// secret holding the write credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagementConfig {
    pub api: UserApiConfig,
    pub secret: SecretLocation,
}

impl ManagementConfig {
    pub fn new(api: UserApiConfig, secret: SecretLocation) -> Self {
        Self { api, secret }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let api = UserApiConfig::from_lookup(&lookup)?;
        let secret = SecretLocation::new(
            required(&lookup, USER_SERVICE_SECRET_NAME)?,
            required(&lookup, USER_SERVICE_SECRET_KEY)?,
        );

        Ok(Self { api, secret })
    }
}

fn optional(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> anyhow::Result<String> {
    optional(lookup, name)
        .ok_or_else(|| anyhow::anyhow!("Missing required environment variable `{}`", name))
}
