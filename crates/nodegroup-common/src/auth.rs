//! API key authentication for the admin endpoint.
//!
//! Group administration changes placement for the whole cluster, so the
//! standalone server can require a shared secret in the `X-API-Key` header.
//! Authentication is off unless a key is configured.
//!
//! ```
//! use nodegroup_common::auth::AuthConfig;
//!
//! let auth = AuthConfig::with_api_key("s3cret");
//! assert!(auth.authorize(Some("s3cret")).is_ok());
//! assert!(auth.authorize(None).is_err());
//! ```

use std::fmt;

use crate::protocol::error::{GroupAdminError, Result};

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

#[derive(Clone, Debug, Default)]
pub struct AuthConfig {
    api_key: Option<String>,
}

impl AuthConfig {
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
        }
    }

    pub fn disabled() -> Self {
        Self { api_key: None }
    }

    /// Builds from an optional key, treating an empty key as disabled.
    pub fn from_optional(api_key: Option<String>) -> Self {
        match api_key {
            Some(key) if !key.is_empty() => Self::with_api_key(key),
            _ => Self::disabled(),
        }
    }

    pub fn requires_auth(&self) -> bool {
        self.api_key.is_some()
    }

    /// Checks the key presented by a caller. Always succeeds when disabled.
    pub fn authorize(&self, provided: Option<&str>) -> Result<()> {
        let Some(expected) = &self.api_key else {
            return Ok(());
        };
        match provided {
            None => Err(GroupAdminError::Unauthorized(format!(
                "missing {} header",
                API_KEY_HEADER
            ))),
            Some(key) if constant_time_eq(expected, key) => Ok(()),
            Some(_) => Err(GroupAdminError::Unauthorized("invalid API key".to_string())),
        }
    }
}

impl fmt::Display for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.api_key {
            Some(_) => write!(f, "ApiKey(*****)"),
            None => write!(f, "Disabled"),
        }
    }
}

/// Compares without short-circuiting on the first differing byte.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (byte_a, byte_b) in a.bytes().zip(b.bytes()) {
        result |= byte_a ^ byte_b;
    }

    result == 0
}
