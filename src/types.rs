//! NewType wrappers for the identifiers exchanged with the user service.
//!
//! These keep usernames, institution identifiers and secret coordinates from
//! being mixed up at call sites that otherwise all take plain strings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate a NewType wrapper with standard trait implementations.
macro_rules! newtype_string {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new instance.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Get the inner value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner String.
            pub fn into_inner(self) -> String {
                self.0
            }

            /// True when the value is empty or whitespace only.
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

newtype_string!(
    /// Unique username in the user service.
    ///
    /// For identity-provider logins this is the external identity id
    /// (e.g. "alice@example.org"). It is also the last path segment of a
    /// lookup URI.
    Username
);

newtype_string!(
    /// Identifier of the institution a user belongs to.
    ///
    /// Usually the organization number supplied by the identity provider.
    InstitutionId
);

newtype_string!(
    /// Name of a role assigned to a user (e.g. "Creator").
    RoleName
);

newtype_string!(
    /// Name of a secret in the secret store.
    SecretName
);

newtype_string!(
    /// Key of a single value inside a named secret.
    SecretKey
);
