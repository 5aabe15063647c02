//! Editor routes — preview rendering and media upload.

use axum::body::Body;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method};

use super::{ApiResult, JsonBody, respond};
use crate::gate::SessionContext;
use crate::proxy::UpstreamCall;
use crate::state::AppState;

const UPSTREAM_PREVIEW: &str = "/editor/preview";
const UPSTREAM_UPLOAD_MEDIA: &str = "/editor/upload/media";

/// `POST /api/editor/preview` — render a preview of unsaved content.
pub async fn preview(State(state): State<AppState>, session: SessionContext, JsonBody(body): JsonBody) -> ApiResult {
    let call = UpstreamCall::new(Method::POST, UPSTREAM_PREVIEW)
        .json(body)
        .bearer(session.bearer());
    state.upstream.call(call).await.map(respond)
}

/// `POST /api/editor/upload/media` — stream a media upload to the backend unchanged.
pub async fn upload_media(
    State(state): State<AppState>,
    session: SessionContext,
    headers: HeaderMap,
    body: Body,
) -> ApiResult {
    let content_type = headers.get(CONTENT_TYPE).cloned();
    let call = UpstreamCall::new(Method::POST, UPSTREAM_UPLOAD_MEDIA)
        .stream(body, content_type)
        .bearer(session.bearer());
    state.upstream.call(call).await.map(respond)
}

#[cfg(test)]
#[path = "editor_test.rs"]
mod tests;
