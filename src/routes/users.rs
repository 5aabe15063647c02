//! User administration routes.

use axum::extract::{Path, RawQuery, State};
use axum::http::Method;

use super::{ApiResult, JsonBody, respond, segment};
use crate::gate::SessionContext;
use crate::pagination::normalize_list_response;
use crate::permissions::Operation;
use crate::proxy::UpstreamCall;
use crate::state::AppState;

const UPSTREAM_USERS: &str = "/users";

/// `GET /api/users` — paginated list in canonical page shape.
pub async fn list(State(state): State<AppState>, session: SessionContext, RawQuery(query): RawQuery) -> ApiResult {
    let call = UpstreamCall::new(Method::GET, UPSTREAM_USERS)
        .query(query.as_deref())
        .bearer(session.bearer());
    let (status, body) = state.upstream.call(call).await?;
    Ok(respond((status, normalize_list_response(body))))
}

/// `POST /api/users` — create a user.
pub async fn create(State(state): State<AppState>, session: SessionContext, JsonBody(body): JsonBody) -> ApiResult {
    let call = UpstreamCall::new(Method::POST, UPSTREAM_USERS)
        .json(body)
        .bearer(session.bearer());
    state.upstream.call(call).await.map(respond)
}

/// `PUT /api/users/:id/password` — change a user's password.
pub async fn change_password(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> ApiResult {
    let call = UpstreamCall::new(Method::PUT, format!("{UPSTREAM_USERS}/{}/password", segment(&id)))
        .json(body)
        .bearer(session.bearer())
        .permission(Operation::UserPasswordChange.permission_code());
    state.upstream.call(call).await.map(respond)
}

/// `POST /api/users/roles/batch` — assign roles to several users.
pub async fn assign_roles(State(state): State<AppState>, session: SessionContext, JsonBody(body): JsonBody) -> ApiResult {
    let call = UpstreamCall::new(Method::POST, format!("{UPSTREAM_USERS}/roles/batch"))
        .json(body)
        .bearer(session.bearer())
        .permission(Operation::UserRoleAssign.permission_code());
    state.upstream.call(call).await.map(respond)
}

#[cfg(test)]
#[path = "users_test.rs"]
mod tests;
