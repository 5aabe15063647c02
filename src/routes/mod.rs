//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The JSON API lives under `/api` and proxies every administrative operation
//! to the backend. Everything else is the admin UI, served as static files
//! from `ADMIN_UI_DIR` behind the page gate, with `index.html` as the SPA
//! fallback for client-side routes.

pub mod auth;
pub mod documents;
pub mod editor;
pub mod users;

use axum::Router;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post, put};
use serde_json::Value;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::error::ProxyError;
use crate::gate;
use crate::state::AppState;

/// Successful proxy response: upstream status plus JSON body.
pub type ApiResult = Result<(StatusCode, Json<Value>), ProxyError>;

pub(crate) fn respond((status, body): (StatusCode, Value)) -> (StatusCode, Json<Value>) {
    (status, Json(body))
}

/// API routes, mounted under `/api`.
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/auth/password-reset", post(auth::password_reset))
        .route("/auth/password-reset-confirm", post(auth::password_reset_confirm))
        .route("/documents", get(documents::list).post(documents::create))
        .route("/documents/batch", post(documents::batch))
        .route(
            "/documents/{id}",
            get(documents::get_one)
                .put(documents::update)
                .delete(documents::delete),
        )
        .route("/editor/preview", post(editor::preview))
        .route("/editor/upload/media", post(editor::upload_media))
        .route("/users", get(users::list).post(users::create))
        .route("/users/{id}/password", put(users::change_password))
        .route("/users/roles/batch", post(users::assign_roles))
}

/// Full application: API, health check, and the gated admin UI.
pub fn app(state: AppState) -> Router {
    let ui_dir = state.config.admin_ui_dir.clone();
    let ui = ServeDir::new(&ui_dir)
        .append_index_html_on_directories(true)
        .fallback(ServeFile::new(ui_dir.join("index.html")));

    Router::new()
        .nest("/api", api_routes())
        .route("/healthz", get(healthz))
        .fallback_service(ui)
        .layer(axum::middleware::from_fn(gate::require_session))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

// =============================================================================
// REQUEST BODY
// =============================================================================

/// JSON request body whose failures render as proxy errors.
///
/// An empty body yields `None` and is forwarded without a body.
pub struct JsonBody(pub Option<Value>);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ProxyError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ProxyError::Validation(e.body_text()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(None));
        }
        serde_json::from_slice(&bytes)
            .map(|value| Self(Some(value)))
            .map_err(|e| ProxyError::Validation(format!("Invalid JSON body: {e}")))
    }
}

/// Require a non-blank string field, or fail with `message`.
pub(crate) fn required_str<'a>(body: Option<&'a Value>, field: &str, message: &str) -> Result<&'a str, ProxyError> {
    body.and_then(|b| b.get(field))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ProxyError::Validation(message.to_owned()))
}

/// Percent-encode a client-supplied path segment before it joins an upstream path.
pub(crate) fn segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
