use super::*;
use crate::error::NETWORK_ERROR_MESSAGE;
use crate::routes::app;
use crate::test_helpers::{json_request, send, session_cookie, spawn_stub, test_app_state, unreachable_base_url};
use axum::Router;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use serde_json::{Value, json};

async fn forbidden() -> (StatusCode, axum::Json<Value>) {
    (StatusCode::FORBIDDEN, axum::Json(json!({ "message": "Access Denied" })))
}

/// Stub backend that denies everything under `/documents`.
fn denying_backend() -> Router {
    Router::new()
        .route("/api/documents", get(forbidden).post(forbidden))
        .route("/api/documents/batch", post(forbidden))
        .route("/api/documents/{id}", get(forbidden).put(forbidden).delete(forbidden))
}

#[test]
fn document_path_encodes_id() {
    assert_eq!(document_path("42"), "/documents/42");
    assert_eq!(document_path("a/../b"), "/documents/a%2F..%2Fb");
}

#[tokio::test]
async fn list_normalizes_items_shape_and_forwards_query_and_bearer() {
    async fn items(headers: HeaderMap, RawQuery(q): RawQuery) -> axum::Json<Value> {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        axum::Json(json!({
            "items": [{ "id": 1, "auth": auth, "query": q }],
            "total": 21,
            "page": 2,
            "pageSize": 10
        }))
    }
    let base = spawn_stub(Router::new().route("/api/documents", get(items))).await;
    let cookie = session_cookie(&["ROLE_ADMIN"], Some("jwt-9"));
    let (status, _, body) =
        send(app(test_app_state(&base)), json_request("GET", "/api/documents?page=2&size=10", None, Some(&cookie))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"][0]["auth"], "Bearer jwt-9");
    assert_eq!(body["content"][0]["query"], "page=2&size=10");
    assert_eq!(body["totalElements"], 21);
    assert_eq!(body["totalPages"], 3);
    assert_eq!(body["number"], 2);
    assert_eq!(body["last"], true);
    assert_eq!(body["first"], false);
}

#[tokio::test]
async fn list_bare_array_becomes_single_page() {
    let stub = Router::new().route("/api/documents", get(|| async { axum::Json(json!([{ "id": 1 }, { "id": 2 }])) }));
    let base = spawn_stub(stub).await;
    let (status, _, body) = send(app(test_app_state(&base)), json_request("GET", "/api/documents", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalElements"], 2);
    assert_eq!(body["size"], 2);
    assert_eq!(body["first"], true);
    assert_eq!(body["last"], true);
}

#[tokio::test]
async fn list_forbidden_reports_view_list() {
    let base = spawn_stub(denying_backend()).await;
    let (status, _, body) = send(app(test_app_state(&base)), json_request("GET", "/api/documents", None, None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["requiredPermission"], "DOC:VIEW:LIST");
    assert_eq!(body["code"], 403);
}

#[tokio::test]
async fn forbidden_codes_per_operation() {
    let base = spawn_stub(denying_backend()).await;
    let cases = [
        ("GET", "/api/documents/42", None, "DOC:VIEW:DETAIL"),
        ("PUT", "/api/documents/42", Some(json!({ "title": "x" })), "DOC:EDIT"),
        ("DELETE", "/api/documents/42", None, "DOC:DELETE"),
        ("POST", "/api/documents/batch", Some(json!({ "operation": "DELETE", "ids": [1, 2] })), "DOC:DELETE"),
        ("POST", "/api/documents/batch", Some(json!({ "operation": "PUBLISH", "ids": [1] })), "DOC:BATCH"),
    ];
    for (method, uri, body, expected) in cases {
        let (status, _, body) = send(app(test_app_state(&base)), json_request(method, uri, body, None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{method} {uri}");
        assert_eq!(body["requiredPermission"], expected, "{method} {uri}");
        assert!(body["message"].as_str().unwrap().contains(expected));
    }
}

#[tokio::test]
async fn create_forbidden_passes_upstream_message() {
    let base = spawn_stub(denying_backend()).await;
    let (status, _, body) = send(
        app(test_app_state(&base)),
        json_request("POST", "/api/documents", Some(json!({ "title": "t" })), None),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "message": "Access Denied" }));
}

#[tokio::test]
async fn delete_empty_success_reports_success() {
    let stub = Router::new().route("/api/documents/{id}", axum::routing::delete(|| async { StatusCode::NO_CONTENT }));
    let base = spawn_stub(stub).await;
    let (status, _, body) = send(app(test_app_state(&base)), json_request("DELETE", "/api/documents/42", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));
}

#[tokio::test]
async fn get_one_passes_body_through() {
    let stub = Router::new().route(
        "/api/documents/{id}",
        get(|axum::extract::Path(id): axum::extract::Path<String>| async move { axum::Json(json!({ "id": id, "title": "Hello" })) }),
    );
    let base = spawn_stub(stub).await;
    let (status, _, body) = send(app(test_app_state(&base)), json_request("GET", "/api/documents/abc", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "id": "abc", "title": "Hello" }));
}

#[tokio::test]
async fn upstream_500_passes_status_and_message() {
    let stub = Router::new().route(
        "/api/documents/{id}",
        axum::routing::put(|| async { (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(json!({ "message": "boom" }))) }),
    );
    let base = spawn_stub(stub).await;
    let (status, _, body) = send(
        app(test_app_state(&base)),
        json_request("PUT", "/api/documents/1", Some(json!({ "title": "x" })), None),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "message": "boom" }));
}

#[tokio::test]
async fn list_unreachable_upstream_is_502() {
    let base = unreachable_base_url().await;
    let cookie = session_cookie(&["ROLE_ADMIN"], Some("jwt"));
    let (status, _, body) = send(app(test_app_state(&base)), json_request("GET", "/api/documents", None, Some(&cookie))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, json!({ "message": NETWORK_ERROR_MESSAGE }));
}

#[tokio::test]
async fn invalid_json_body_is_400() {
    let base = unreachable_base_url().await;
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/documents")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let (status, _, body) = send(app(test_app_state(&base)), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().starts_with("Invalid JSON body"));
}
