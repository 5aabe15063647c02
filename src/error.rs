//! Proxy error taxonomy and its HTTP rendering.
//!
//! Every failure is rendered as a JSON body with a `message` field, so the
//! UI never has to handle a bare status or an HTML error page.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

use crate::permissions::denial_message;

pub const NETWORK_ERROR_MESSAGE: &str = "Network error: unable to reach the backend service";

/// Errors produced while serving an API request.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// The request body is missing a required field. Never reaches upstream.
    #[error("{0}")]
    Validation(String),

    /// Upstream answered 403 for an operation with a known permission code.
    #[error("missing permission {permission}")]
    PermissionDenied { permission: &'static str },

    /// Upstream answered with any other non-success status.
    #[error("upstream error: status {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Upstream could not be reached; no response arrived.
    #[error("upstream transport failed: {0}")]
    Transport(String),

    /// Upstream answered with `status` but its body could not be read.
    #[error("upstream body read failed after status {status}: {detail}")]
    BodyRead { status: u16, detail: String },

    /// The outbound HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),
}

impl ProxyError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::PermissionDenied { .. } => StatusCode::FORBIDDEN,
            Self::Upstream { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            Self::Transport(_) | Self::BodyRead { .. } => StatusCode::BAD_GATEWAY,
            Self::ClientBuild(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::Validation(message) | Self::Upstream { message, .. } => json!({ "message": message }),
            Self::PermissionDenied { permission } => json!({
                "message": denial_message(permission),
                "requiredPermission": permission,
                "code": StatusCode::FORBIDDEN.as_u16(),
            }),
            Self::Transport(_) | Self::BodyRead { .. } => json!({ "message": NETWORK_ERROR_MESSAGE }),
            Self::ClientBuild(_) => json!({ "message": "Internal server error" }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
