//! Auth routes — login, logout, current session, password reset.

use axum::extract::State;
use axum::http::Method;
use axum::response::{IntoResponse, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::{Value, json};
use time::Duration;

use super::{ApiResult, JsonBody, required_str, respond};
use crate::config::GatewayConfig;
use crate::error::ProxyError;
use crate::gate::SessionContext;
use crate::proxy::UpstreamCall;
use crate::session::{self, SessionPayload};
use crate::state::AppState;

const UPSTREAM_LOGIN: &str = "/auth/login";
const UPSTREAM_PASSWORD_RESET: &str = "/auth/password-reset";
const UPSTREAM_PASSWORD_RESET_CONFIRM: &str = "/auth/password-reset/confirm";

fn session_cookie(config: &GatewayConfig, value: String) -> Cookie<'static> {
    Cookie::build((session::COOKIE_NAME, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .max_age(Duration::hours(session::SESSION_TTL_HOURS))
        .build()
}

// =============================================================================
// LOGIN
// =============================================================================

/// Build the session from an upstream login response.
///
/// Accepts `{token|accessToken, user, roles?}`, optionally wrapped in `{data}`.
pub(crate) fn session_from_login(response: Value) -> SessionPayload {
    let mut response = response;
    if response.get("data").is_some_and(Value::is_object) {
        response = response["data"].take();
    }

    let token = ["token", "accessToken"]
        .iter()
        .find_map(|key| response.get(*key).and_then(Value::as_str))
        .map(str::to_owned);
    let user = response.get_mut("user").map(Value::take).unwrap_or(Value::Null);
    let mut payload = SessionPayload::new(user, token);

    if payload.user.get("roles").is_none() {
        payload.roles = response.get_mut("roles").filter(|roles| roles.is_array()).map(Value::take);
    }
    payload
}

/// Canned roles for the offline demo login.
pub(crate) fn mock_roles(username: &str) -> &'static [&'static str] {
    match username {
        "admin" => &["ROLE_ADMIN"],
        "editor" => &["ROLE_EDITOR"],
        "reviewer" => &["ROLE_REVIEWER"],
        "viewer" => &["ROLE_VIEWER"],
        _ => &["ROLE_USER"],
    }
}

/// Deterministic session issued when the backend is unreachable.
pub(crate) fn mock_session(username: &str) -> SessionPayload {
    let user = json!({
        "id": format!("mock-{username}"),
        "username": username,
        "displayName": username,
        "roles": mock_roles(username),
    });
    SessionPayload::new(user, None)
}

/// `POST /api/auth/login` — exchange credentials, set the session cookie.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(body): JsonBody,
) -> Result<(CookieJar, Json<Value>), ProxyError> {
    const MISSING: &str = "Username and password are required";
    let username = required_str(body.as_ref(), "username", MISSING)?.to_owned();
    required_str(body.as_ref(), "password", MISSING)?;

    let call = UpstreamCall::new(Method::POST, UPSTREAM_LOGIN).json(body);
    let payload = match state.upstream.call(call).await {
        Ok((_, response)) => session_from_login(response),
        // Only when no response arrived; `BodyRead` means upstream answered.
        Err(ProxyError::Transport(detail)) if state.config.mock_login_fallback => {
            tracing::warn!(%username, error = %detail, "backend unreachable, issuing mock session");
            mock_session(&username)
        }
        Err(e) => {
            tracing::info!(%username, status = e.status().as_u16(), "login rejected");
            return Err(e);
        }
    };

    let roles = payload.roles();
    tracing::info!(%username, roles = roles.len(), "login succeeded");
    let jar = jar.add(session_cookie(&state.config, session::encode(&payload)));
    Ok((jar, Json(json!({ "user": payload.user, "roles": roles }))))
}

// =============================================================================
// SESSION
// =============================================================================

/// `POST /api/auth/logout` — clear the session cookie.
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let cookie = Cookie::build((session::COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.cookie_secure)
        .max_age(Duration::ZERO);

    let jar = CookieJar::new().add(cookie);
    (jar, Json(json!({ "success": true })))
}

/// `GET /api/auth/me` — report the current session. Never fails.
pub async fn me(session: SessionContext) -> Json<Value> {
    Json(json!({
        "authenticated": session.is_authenticated(),
        "user": session.user(),
        "roles": session.roles(),
    }))
}

// =============================================================================
// PASSWORD RESET
// =============================================================================

/// `POST /api/auth/password-reset` — request a reset email.
pub async fn password_reset(State(state): State<AppState>, JsonBody(body): JsonBody) -> ApiResult {
    required_str(body.as_ref(), "email", "Email is required")?;
    let call = UpstreamCall::new(Method::POST, UPSTREAM_PASSWORD_RESET).json(body);
    state.upstream.call(call).await.map(respond)
}

/// `POST /api/auth/password-reset-confirm` — set a new password with a reset token.
pub async fn password_reset_confirm(State(state): State<AppState>, JsonBody(body): JsonBody) -> ApiResult {
    const MISSING: &str = "Token and new password are required";
    required_str(body.as_ref(), "token", MISSING)?;
    required_str(body.as_ref(), "newPassword", MISSING)?;
    let call = UpstreamCall::new(Method::POST, UPSTREAM_PASSWORD_RESET_CONFIRM).json(body);
    state.upstream.call(call).await.map(respond)
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
