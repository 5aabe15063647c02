//! Document routes.

use axum::extract::{Path, RawQuery, State};
use axum::http::Method;

use super::{ApiResult, JsonBody, respond, segment};
use crate::gate::SessionContext;
use crate::pagination::normalize_list_response;
use crate::permissions::{Operation, batch_permission};
use crate::proxy::UpstreamCall;
use crate::state::AppState;

const UPSTREAM_DOCUMENTS: &str = "/documents";

fn document_path(id: &str) -> String {
    format!("{UPSTREAM_DOCUMENTS}/{}", segment(id))
}

/// `GET /api/documents` — paginated list in canonical page shape.
pub async fn list(State(state): State<AppState>, session: SessionContext, RawQuery(query): RawQuery) -> ApiResult {
    let call = UpstreamCall::new(Method::GET, UPSTREAM_DOCUMENTS)
        .query(query.as_deref())
        .bearer(session.bearer())
        .permission(Operation::DocumentList.permission_code());
    let (status, body) = state.upstream.call(call).await?;
    Ok(respond((status, normalize_list_response(body))))
}

/// `POST /api/documents` — create a document.
pub async fn create(State(state): State<AppState>, session: SessionContext, JsonBody(body): JsonBody) -> ApiResult {
    let call = UpstreamCall::new(Method::POST, UPSTREAM_DOCUMENTS)
        .json(body)
        .bearer(session.bearer());
    state.upstream.call(call).await.map(respond)
}

/// `GET /api/documents/:id` — fetch one document.
pub async fn get_one(State(state): State<AppState>, session: SessionContext, Path(id): Path<String>) -> ApiResult {
    let call = UpstreamCall::new(Method::GET, document_path(&id))
        .bearer(session.bearer())
        .permission(Operation::DocumentViewDetail.permission_code());
    state.upstream.call(call).await.map(respond)
}

/// `PUT /api/documents/:id` — update a document.
pub async fn update(
    State(state): State<AppState>,
    session: SessionContext,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> ApiResult {
    let call = UpstreamCall::new(Method::PUT, document_path(&id))
        .json(body)
        .bearer(session.bearer())
        .permission(Operation::DocumentEdit.permission_code());
    state.upstream.call(call).await.map(respond)
}

/// `DELETE /api/documents/:id` — delete a document.
pub async fn delete(State(state): State<AppState>, session: SessionContext, Path(id): Path<String>) -> ApiResult {
    let call = UpstreamCall::new(Method::DELETE, document_path(&id))
        .bearer(session.bearer())
        .permission(Operation::DocumentDelete.permission_code());
    state.upstream.call(call).await.map(respond)
}

/// `POST /api/documents/batch` — batch operation; the denial code follows `operation`.
pub async fn batch(State(state): State<AppState>, session: SessionContext, JsonBody(body): JsonBody) -> ApiResult {
    let permission = batch_permission(body.as_ref().unwrap_or(&serde_json::Value::Null));
    let call = UpstreamCall::new(Method::POST, format!("{UPSTREAM_DOCUMENTS}/batch"))
        .json(body)
        .bearer(session.bearer())
        .permission(permission);
    state.upstream.call(call).await.map(respond)
}

#[cfg(test)]
#[path = "documents_test.rs"]
mod tests;
