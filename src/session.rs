//! Session cookie codec.
//!
//! ARCHITECTURE
//! ============
//! The session is self-contained: the cookie value is the URL-safe base64
//! encoding of a JSON `{user, token}` payload. There is no server-side store,
//! so the cookie is the only source of truth for who the caller is.
//!
//! TRADE-OFFS
//! ==========
//! The payload is neither encrypted nor signed. A tampered cookie can claim
//! any roles, but every proxied call carries the upstream bearer token, which
//! the backend validates on its own. Role checks here only steer navigation.

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of the cookie carrying the encoded session.
pub const COOKIE_NAME: &str = "session";

/// Cookie lifetime after issuance.
pub const SESSION_TTL_HOURS: i64 = 12;

/// Decoded session contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionPayload {
    /// User object as returned by the backend. Roles live at `user.roles`.
    #[serde(default)]
    pub user: Value,
    /// Bearer credential for the upstream API.
    #[serde(default)]
    pub token: Option<String>,
    /// Legacy top-level role list, consulted when `user.roles` is absent.
    /// Untyped: a malformed list must not reject the whole cookie.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Value>,
}

impl SessionPayload {
    #[must_use]
    pub fn new(user: Value, token: Option<String>) -> Self {
        Self { user, token, roles: None }
    }

    /// Role names at `user.roles`, falling back to the top-level `roles`.
    ///
    /// Non-string entries are skipped; a missing list yields an empty one.
    #[must_use]
    pub fn roles(&self) -> Vec<String> {
        self.user
            .get("roles")
            .and_then(Value::as_array)
            .or_else(|| self.roles.as_ref().and_then(Value::as_array))
            .map(|list| {
                list.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Bearer token, if present and non-empty.
    #[must_use]
    pub fn bearer(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }
}

/// Serialize a payload into a cookie-safe token.
#[must_use]
pub fn encode(payload: &SessionPayload) -> String {
    // Serializing a `Value`-backed struct cannot fail.
    let json = serde_json::to_vec(payload).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

/// Decode a cookie token. Any malformed input yields `None`.
#[must_use]
pub fn decode(token: &str) -> Option<SessionPayload> {
    let trimmed = token.trim().trim_end_matches('=');
    if trimmed.is_empty() {
        return None;
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(trimmed)
        .or_else(|_| STANDARD_NO_PAD.decode(trimmed))
        .ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
