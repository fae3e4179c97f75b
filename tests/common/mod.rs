//! In-process HTTP stub for integration tests.

#![allow(dead_code)]

use std::net::TcpListener as StdTcpListener;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const SLOW_DELAY: Duration = Duration::from_secs(3);

pub struct StubServer {
    base_url: String,
    join: JoinHandle<()>,
}

impl StubServer {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.join.abort();
    }
}

async fn widget(Path(id): Path<u32>) -> impl IntoResponse {
    if id == 0 {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "invalid id" })));
    }
    (StatusCode::OK, Json(json!({ "id": id, "name": "sprocket" })))
}

async fn create_item(body: String) -> impl IntoResponse {
    (StatusCode::CREATED, body)
}

async fn not_found() -> impl IntoResponse {
    StatusCode::NOT_FOUND
}

async fn slow() -> impl IntoResponse {
    tokio::time::sleep(SLOW_DELAY).await;
    StatusCode::OK
}

async fn html_page() -> impl IntoResponse {
    (StatusCode::OK, "<html><body>not json</body></html>")
}

/// Echoes the interesting request headers and the body back as JSON.
async fn echo(headers: HeaderMap, body: String) -> Json<Value> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    Json(json!({
        "content_type": header("content-type"),
        "content_language": header("content-language"),
        "api_key": header("x-api-key"),
        "body": body,
    }))
}

async fn echo_get(headers: HeaderMap) -> Json<Value> {
    echo(headers, String::new()).await
}

pub async fn spawn() -> StubServer {
    let router = Router::new()
        .route("/widgets/{id}", get(widget))
        .route("/items", post(create_item))
        .route("/missing", get(not_found))
        .route("/slow", get(slow))
        .route("/html", get(html_page))
        .route("/echo", post(echo).get(echo_get));

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub listener");
    let addr = listener.local_addr().expect("stub address");
    let join = tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    StubServer {
        base_url: format!("http://{addr}"),
        join,
    }
}

/// An address nothing listens on.
pub fn closed_address() -> String {
    let listener = StdTcpListener::bind("127.0.0.1:0").expect("bind probe listener");
    let addr = listener.local_addr().expect("probe address");
    drop(listener);
    format!("http://{addr}")
}
