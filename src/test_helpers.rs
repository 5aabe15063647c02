//! Shared fixtures for route and proxy tests.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tower::ServiceExt;

use crate::config::GatewayConfig;
use crate::session::{self, SessionPayload};
use crate::state::AppState;

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("stub bind should succeed");
    let addr = listener.local_addr().expect("stub addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{addr}/api")
}

/// Serve one connection on a raw socket: read the full request, write
/// `response` verbatim, then close. Returns the base URL.
pub async fn spawn_raw_stub(response: &'static [u8]) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("raw stub bind should succeed");
    let addr = listener.local_addr().expect("raw stub addr");
    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };
        read_request(&mut socket).await;
        let _ = socket.write_all(response).await;
        let _ = socket.shutdown().await;
    });
    format!("http://{addr}/api")
}

/// Drain one HTTP/1.1 request (headers plus `Content-Length` body).
async fn read_request(socket: &mut tokio::net::TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0_u8; 1024];
    loop {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
        let Some(head_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&buf[..head_end]).to_ascii_lowercase();
        let body_len = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if buf.len() >= head_end + 4 + body_len {
            return;
        }
    }
}

/// Base URL of a port nobody is listening on.
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("probe bind should succeed");
    let addr = listener.local_addr().expect("probe addr");
    drop(listener);
    format!("http://{addr}/api")
}

/// App state pointing at `base_url`.
#[must_use]
pub fn test_app_state(base_url: &str) -> AppState {
    AppState::new(GatewayConfig::for_upstream(base_url)).expect("test client should build")
}

/// Encoded session cookie header value for the given roles and token.
#[must_use]
pub fn session_cookie(roles: &[&str], token: Option<&str>) -> String {
    let payload = SessionPayload::new(
        serde_json::json!({ "id": 7, "username": "tester", "roles": roles }),
        token.map(str::to_owned),
    );
    format!("{}={}", session::COOKIE_NAME, session::encode(&payload))
}

/// Send one request through `app` and return status, headers and JSON body.
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, serde_json::Value) {
    let response: Response<Body> = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should collect");
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, headers, body)
}

/// Build a JSON request, optionally carrying a cookie header.
#[must_use]
pub fn json_request(method: &str, uri: &str, body: Option<serde_json::Value>, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&value).expect("serializable"))
        }
        None => Body::empty(),
    };
    builder.body(body).expect("valid request")
}
