//! Upstream backend client.
//!
//! ARCHITECTURE
//! ============
//! Every API route is a thin translation onto one [`Upstream::call`]: the
//! route picks the method, path suffix and permission code, and this module
//! attaches the session's bearer token, performs exactly one request, and
//! maps the outcome onto [`ProxyError`]. Response interpretation lives in the
//! pure [`interpret`] function so it can be tested without a socket.
//!
//! TRADE-OFFS
//! ==========
//! No retries. A transport failure surfaces immediately as 502 so the UI can
//! tell "backend down" apart from "backend said no".

use std::time::Duration;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method, StatusCode};
use serde_json::{Value, json};

use crate::config::GatewayConfig;
use crate::error::ProxyError;

// =============================================================================
// CALL DESCRIPTION
// =============================================================================

/// Body forwarded to the upstream.
pub enum UpstreamBody {
    Empty,
    Json(Value),
    /// Raw request body streamed through unchanged, with its content type.
    Stream { body: Body, content_type: Option<HeaderValue> },
}

/// One outbound request, built by a route handler.
pub struct UpstreamCall<'a> {
    method: Method,
    path: String,
    query: Option<&'a str>,
    body: UpstreamBody,
    bearer: Option<&'a str>,
    permission: Option<&'static str>,
}

impl<'a> UpstreamCall<'a> {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), query: None, body: UpstreamBody::Empty, bearer: None, permission: None }
    }

    /// Forward the caller's raw query string.
    #[must_use]
    pub fn query(mut self, query: Option<&'a str>) -> Self {
        self.query = query.filter(|q| !q.is_empty());
        self
    }

    /// JSON body; `None` sends no body at all.
    #[must_use]
    pub fn json(mut self, body: impl Into<Option<Value>>) -> Self {
        self.body = body.into().map_or(UpstreamBody::Empty, UpstreamBody::Json);
        self
    }

    #[must_use]
    pub fn stream(mut self, body: Body, content_type: Option<HeaderValue>) -> Self {
        self.body = UpstreamBody::Stream { body, content_type };
        self
    }

    #[must_use]
    pub fn bearer(mut self, token: Option<&'a str>) -> Self {
        self.bearer = token;
        self
    }

    /// Permission code reported when the upstream answers 403.
    #[must_use]
    pub fn permission(mut self, code: &'static str) -> Self {
        self.permission = Some(code);
        self
    }
}

// =============================================================================
// CLIENT
// =============================================================================

/// Shared HTTP client bound to the configured upstream base URL.
#[derive(Clone)]
pub struct Upstream {
    http: reqwest::Client,
    base_url: String,
}

impl Upstream {
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &GatewayConfig) -> Result<Self, ProxyError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ProxyError::ClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.upstream_base_url.clone() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full upstream URL for a path suffix and optional raw query.
    #[must_use]
    pub fn url(&self, path: &str, query: Option<&str>) -> String {
        match query {
            Some(q) if !q.is_empty() => format!("{}{path}?{q}", self.base_url),
            _ => format!("{}{path}", self.base_url),
        }
    }

    /// Perform one upstream request and interpret its outcome.
    ///
    /// # Errors
    ///
    /// [`ProxyError::Transport`] when the upstream is unreachable,
    /// [`ProxyError::BodyRead`] when it answered but the body was cut short,
    /// otherwise the error produced by [`interpret`] for a non-success status.
    pub async fn call(&self, call: UpstreamCall<'_>) -> Result<(StatusCode, Value), ProxyError> {
        let url = self.url(&call.path, call.query);
        let mut request = self.http.request(call.method.clone(), &url);
        if let Some(token) = call.bearer {
            request = request.bearer_auth(token);
        }
        request = match call.body {
            UpstreamBody::Empty => request,
            UpstreamBody::Json(body) => request.json(&body),
            UpstreamBody::Stream { body, content_type } => {
                let request = request.body(reqwest::Body::wrap_stream(body.into_data_stream()));
                match content_type {
                    Some(ct) => request.header(CONTENT_TYPE, ct),
                    None => request,
                }
            }
        };

        let response = request.send().await.map_err(|e| {
            tracing::warn!(method = %call.method, %url, error = %e, "upstream unreachable");
            ProxyError::Transport(e.to_string())
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            tracing::warn!(method = %call.method, %url, status = status.as_u16(), error = %e, "upstream body read failed");
            ProxyError::BodyRead { status: status.as_u16(), detail: e.to_string() }
        })?;

        if status.is_server_error() {
            tracing::error!(method = %call.method, %url, status = status.as_u16(), "upstream server error");
        } else {
            tracing::debug!(method = %call.method, %url, status = status.as_u16(), "upstream call");
        }

        interpret(status, &text, call.permission)
    }
}

// =============================================================================
// INTERPRETATION
// =============================================================================

/// Map an upstream status and body onto the proxy contract.
///
/// # Errors
///
/// [`ProxyError::PermissionDenied`] for a 403 with a known permission code,
/// [`ProxyError::Upstream`] for every other non-success status.
pub fn interpret(status: StatusCode, text: &str, permission: Option<&'static str>) -> Result<(StatusCode, Value), ProxyError> {
    if status.is_success() {
        if text.trim().is_empty() {
            // 204 cannot carry the success flag the UI expects.
            return Ok((StatusCode::OK, json!({ "success": true })));
        }
        return Ok((status, success_body(text)));
    }

    if status == StatusCode::FORBIDDEN {
        if let Some(permission) = permission {
            return Err(ProxyError::PermissionDenied { permission });
        }
    }

    let message = upstream_message(text)
        .unwrap_or_else(|| format!("Upstream request failed with status {}", status.as_u16()));
    Err(ProxyError::Upstream { status: status.as_u16(), message })
}

fn success_body(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| json!({ "success": true, "data": text }))
}

/// `message` (or `error`) string from an upstream error body.
pub(crate) fn upstream_message(text: &str) -> Option<String> {
    let value: Value = serde_json::from_str(text).ok()?;
    ["message", "error"].iter().find_map(|key| {
        value
            .get(*key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_owned)
    })
}

#[cfg(test)]
#[path = "proxy_test.rs"]
mod tests;
