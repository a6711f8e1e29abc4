//! Bearer credential normalization and authorization.

use serde::{Deserialize, Serialize};

use crate::security::constant_time_eq;

const BEARER_PREFIX: &str = "Bearer ";

/// How a vector treats the `Bearer ` scheme marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthScheme {
    /// The credential must start with a literal, case-sensitive `Bearer `
    /// which is stripped once.
    RequireBearer,
    /// Any number of leading `bearer ` markers (any ASCII case) are stripped;
    /// bare tokens are accepted.
    OptionalBearer,
}

/// Normalize a raw credential. Returns `None` when the scheme rejects its shape.
///
/// The result never carries surrounding whitespace, and normalizing an
/// already-normalized `OptionalBearer` token returns it unchanged.
pub fn normalize_credential(raw: Option<&str>, scheme: AuthScheme) -> Option<&str> {
    let token = raw.unwrap_or_default().trim();
    match scheme {
        AuthScheme::RequireBearer => token.strip_prefix(BEARER_PREFIX).map(str::trim),
        AuthScheme::OptionalBearer => Some(strip_bearer_markers(token)),
    }
}

fn strip_bearer_markers(mut token: &str) -> &str {
    while token
        .get(..BEARER_PREFIX.len())
        .is_some_and(|p| p.eq_ignore_ascii_case(BEARER_PREFIX))
    {
        token = token[BEARER_PREFIX.len()..].trim();
    }
    token
}

/// Validates credentials against the process-wide auth secret.
#[derive(Clone)]
pub struct Authorizer {
    scheme: AuthScheme,
    secret: Option<String>,
}

impl std::fmt::Debug for Authorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authorizer")
            .field("scheme", &self.scheme)
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Authorizer {
    /// An empty secret counts as unconfigured.
    pub fn new(scheme: AuthScheme, secret: Option<String>) -> Self {
        Self {
            scheme,
            secret: secret.filter(|s| !s.is_empty()),
        }
    }

    pub fn scheme(&self) -> AuthScheme {
        self.scheme
    }

    /// `true` when no secret is configured and any non-empty credential passes.
    pub fn is_permissive(&self) -> bool {
        self.secret.is_none()
    }

    pub fn is_authorized(&self, raw: Option<&str>) -> bool {
        let token = match normalize_credential(raw, self.scheme) {
            Some(t) if !t.is_empty() => t,
            _ => {
                tracing::debug!(scheme = ?self.scheme, "credential missing or malformed");
                return false;
            }
        };
        match &self.secret {
            None => true,
            Some(secret) => constant_time_eq(token.as_bytes(), secret.as_bytes()),
        }
    }
}
