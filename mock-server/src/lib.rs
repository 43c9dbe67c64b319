use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{OriginalUri, Path, Query, State},
    http::{header, HeaderMap, Method, StatusCode},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// Prefix every route is mounted under.
pub const CONTEXT_PATH: &str = "/test";

/// What `/inspect` saw of the incoming request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Inspection {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

#[derive(Deserialize)]
pub struct StatusParams {
    pub body: Option<String>,
}

/// Number of requests served, excluding `/hits` itself.
pub type Hits = Arc<AtomicUsize>;

pub fn app() -> Router {
    let hits: Hits = Arc::new(AtomicUsize::new(0));
    let routes = Router::new()
        .route("/body", any(body))
        .route("/nobody", any(no_body))
        .route("/echo", any(echo))
        .route("/inspect", any(inspect))
        .route("/status/{code}", any(status))
        .route("/hits", get(count_hits));
    Router::new().nest(CONTEXT_PATH, routes).with_state(hits)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn body(State(hits): State<Hits>) -> ([(header::HeaderName, &'static str); 1], &'static str) {
    hits.fetch_add(1, Ordering::SeqCst);
    (
        [(header::CONTENT_TYPE, "application/json")],
        r#"{"value":"bar"}"#,
    )
}

async fn no_body(State(hits): State<Hits>) -> StatusCode {
    hits.fetch_add(1, Ordering::SeqCst);
    StatusCode::OK
}

async fn echo(State(hits): State<Hits>, headers: HeaderMap, body: Bytes) -> (HeaderMap, Bytes) {
    hits.fetch_add(1, Ordering::SeqCst);
    let mut response_headers = HeaderMap::new();
    if let Some(content_type) = headers.get(header::CONTENT_TYPE) {
        response_headers.insert(header::CONTENT_TYPE, content_type.clone());
    }
    (response_headers, body)
}

async fn inspect(
    State(hits): State<Hits>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Inspection> {
    hits.fetch_add(1, Ordering::SeqCst);
    let headers = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();
    Json(Inspection {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

async fn status(
    State(hits): State<Hits>,
    Path(code): Path<u16>,
    Query(params): Query<StatusParams>,
) -> Result<(StatusCode, String), StatusCode> {
    hits.fetch_add(1, Ordering::SeqCst);
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok((status, params.body.unwrap_or_default()))
}

async fn count_hits(State(hits): State<Hits>) -> Json<usize> {
    Json(hits.load(Ordering::SeqCst))
}
