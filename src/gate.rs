//! Auth gate — session resolution for API handlers and page navigation.
//!
//! A caller is authenticated when the `session` cookie decodes and carries at
//! least one role. A malformed cookie, a missing role list and an empty role
//! list all mean "anonymous"; none of them is an error.

use std::convert::Infallible;

use axum::extract::{FromRequestParts, Request};
use axum::http::request::Parts;
use axum::http::uri::PathAndQuery;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde_json::Value;

use crate::session::{self, SessionPayload};

pub const LOGIN_PATH: &str = "/login";

/// Pages and assets reachable without a session.
const PUBLIC_PATHS: &[&str] = &[LOGIN_PATH, "/forgot-password", "/reset-password", "/healthz", "/favicon.ico"];
const PUBLIC_PREFIXES: &[&str] = &["/api/", "/assets/", "/static/"];

/// True iff the token decodes and the session carries at least one role.
#[must_use]
pub fn is_authenticated(token: Option<&str>) -> bool {
    token
        .and_then(session::decode)
        .is_some_and(|payload| !payload.roles().is_empty())
}

/// Login URL that returns the user to `path_and_query` afterwards.
#[must_use]
pub fn login_redirect(path_and_query: &str) -> String {
    format!("{LOGIN_PATH}?redirect={}", urlencoding::encode(path_and_query))
}

/// Paths the page gate never redirects.
///
/// API routes answer for themselves: the upstream rejects anonymous calls.
#[must_use]
pub fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path) || path == "/api" || PUBLIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// Page middleware: redirect anonymous navigation to the login page.
pub async fn require_session(jar: CookieJar, request: Request, next: Next) -> Response {
    let path = request.uri().path();
    if is_public_path(path) || is_authenticated(jar.get(session::COOKIE_NAME).map(Cookie::value)) {
        return next.run(request).await;
    }

    let target = request
        .uri()
        .path_and_query()
        .map_or_else(|| request.uri().path(), PathAndQuery::as_str);
    tracing::debug!(%target, "anonymous page request redirected to login");
    Redirect::temporary(&login_redirect(target)).into_response()
}

// =============================================================================
// SESSION EXTRACTOR
// =============================================================================

/// Session decoded from the request cookie. Extraction never fails.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub payload: Option<SessionPayload>,
}

impl SessionContext {
    #[must_use]
    pub fn from_jar(jar: &CookieJar) -> Self {
        let payload = jar
            .get(session::COOKIE_NAME)
            .map(Cookie::value)
            .and_then(session::decode);
        Self { payload }
    }

    /// Bearer token to forward upstream, if the session carries one.
    #[must_use]
    pub fn bearer(&self) -> Option<&str> {
        self.payload.as_ref().and_then(SessionPayload::bearer)
    }

    #[must_use]
    pub fn roles(&self) -> Vec<String> {
        self.payload
            .as_ref()
            .map(SessionPayload::roles)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !self.roles().is_empty()
    }

    /// User object, `null` when anonymous.
    #[must_use]
    pub fn user(&self) -> Value {
        self.payload
            .as_ref()
            .map_or(Value::Null, |payload| payload.user.clone())
    }
}

impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_jar(&CookieJar::from_headers(&parts.headers)))
    }
}

#[cfg(test)]
#[path = "gate_test.rs"]
mod tests;
