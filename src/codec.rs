//! JSON encoding and decoding of user payloads.

use crate::error::DecodeError;
use crate::model::User;

/// Decode a response body into a [`User`].
///
/// Fails on malformed JSON and on payloads missing `username` or
/// `institutionId`. Never returns a partially decoded user.
pub fn decode_user(body: &[u8]) -> Result<User, DecodeError> {
    Ok(serde_json::from_slice(body)?)
}

/// Encode a [`User`] as a creation request body.
pub fn encode_user(user: &User) -> Vec<u8> {
    // string fields only; serializing into a Vec cannot fail
    serde_json::to_vec(user).unwrap_or_default()
}
