//! Access-key verification.
//!
//! Clients authenticate with an `Authorisation: Key <access-key>` header.
//! The registry maps each known key to the user it belongs to. Keys come
//! from configuration; without one, a fixed development set is used.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use cart_core::UserId;

use crate::config::AccessKeyConfig;

/// Name of the request header carrying the access key.
pub const AUTHORISATION_HEADER: &str = "authorisation";

/// Scheme prefix expected in the header value.
const KEY_SCHEME: &str = "Key";

/// Development keys: `(key, user_id)`.
const DEVELOPMENT_KEYS: &[(&str, i64)] = &[
    ("abcdef123456", 1),
    ("bcdefg123456", 12),
    ("cdefgh123456", 20),
];

/// Errors that can occur while verifying an access key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessError {
    /// No key, or the header is not of the form `Key <access-key>`.
    #[error("missing access key")]
    MissingKey,

    /// The key is not registered.
    #[error("access key not found")]
    UnknownKey,
}

/// Known access keys and the users they resolve to.
///
/// Cheap to clone; the key list is shared.
#[derive(Clone)]
pub struct AccessKeyRegistry {
    keys: Arc<[AccessKeyConfig]>,
}

impl std::fmt::Debug for AccessKeyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessKeyRegistry")
            .field("keys", &self.keys.len())
            .finish()
    }
}

impl AccessKeyRegistry {
    /// Create a registry from configured keys.
    #[must_use]
    pub fn new(keys: Vec<AccessKeyConfig>) -> Self {
        Self { keys: keys.into() }
    }

    /// Registry seeded with the development keys for users 1, 12 and 20.
    #[must_use]
    pub fn development() -> Self {
        Self::new(
            DEVELOPMENT_KEYS
                .iter()
                .map(|&(key, user)| AccessKeyConfig {
                    key: SecretString::from(key),
                    user_id: UserId::new(user),
                })
                .collect(),
        )
    }

    /// Resolve a raw header value (`Key <access-key>`) to a user.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::MissingKey` if the header is malformed.
    /// Returns `AccessError::UnknownKey` if the key is not registered.
    pub fn verify_header(&self, header: &str) -> Result<UserId, AccessError> {
        let key = key_from_header(header).ok_or(AccessError::MissingKey)?;
        self.verify(key)
    }

    /// Resolve an access key to the user it belongs to.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::UnknownKey` if the key is not registered.
    pub fn verify(&self, key: &str) -> Result<UserId, AccessError> {
        self.keys
            .iter()
            .find(|entry| entry.key.expose_secret() == key)
            .map(|entry| entry.user_id)
            .ok_or(AccessError::UnknownKey)
    }
}

/// Extract the key from a `Key <access-key>` header value.
///
/// Returns `None` unless the value has exactly two whitespace-separated
/// fields and the first is `Key`.
#[must_use]
pub fn key_from_header(value: &str) -> Option<&str> {
    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(KEY_SCHEME), Some(key), None) => Some(key),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_header() {
        assert_eq!(key_from_header("Key abcdef123456"), Some("abcdef123456"));
        assert_eq!(key_from_header("  Key   abc  "), Some("abc"));
        assert_eq!(key_from_header("Bearer abc"), None);
        assert_eq!(key_from_header("Key"), None);
        assert_eq!(key_from_header("Key a b"), None);
        assert_eq!(key_from_header(""), None);
    }

    #[test]
    fn test_development_keys_resolve() {
        let registry = AccessKeyRegistry::development();
        assert_eq!(registry.verify("abcdef123456"), Ok(UserId::new(1)));
        assert_eq!(registry.verify("bcdefg123456"), Ok(UserId::new(12)));
        assert_eq!(registry.verify("cdefgh123456"), Ok(UserId::new(20)));
    }

    #[test]
    fn test_unknown_key() {
        let registry = AccessKeyRegistry::development();
        assert_eq!(registry.verify("nope"), Err(AccessError::UnknownKey));
    }

    #[test]
    fn test_verify_header() {
        let registry = AccessKeyRegistry::development();
        assert_eq!(
            registry.verify_header("Key cdefgh123456"),
            Ok(UserId::new(20))
        );
        assert_eq!(
            registry.verify_header("cdefgh123456"),
            Err(AccessError::MissingKey)
        );
    }

    #[test]
    fn test_debug_does_not_leak_keys() {
        let debug_output = format!("{:?}", AccessKeyRegistry::development());
        assert!(!debug_output.contains("abcdef123456"));
    }
}
