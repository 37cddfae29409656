//! One log line per request start and finish
//!
//! Form posts carry credentials in the body and the session in a cookie, so
//! bodies are never logged and cookie headers are masked. The request id is
//! taken from `x-request-id` or generated, and echoed on the response.

use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{header, HeaderMap, HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::info;

const REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Headers worth a log line. Values of the masked ones are replaced.
const LOGGED_HEADERS: &[&str] = &[
    "content-type",
    "content-length",
    "user-agent",
    "referer",
    "x-forwarded-for",
    "cookie",
    "authorization",
];
const MASKED_HEADERS: &[&str] = &["cookie", "set-cookie", "authorization"];

/// Spans come from `TraceLayer`; this stage only adds the event lines.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let route = route_of(&request);
    let request_id = request_id_of(request.headers());

    info!(
        %method,
        %route,
        %request_id,
        headers = %loggable_headers(request.headers()),
        "Request received"
    );

    let mut response = next.run(request).await;

    let redirect = response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    info!(
        %method,
        %route,
        %request_id,
        status = response.status().as_u16(),
        redirect,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Request finished"
    );

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID, value);
    }
    response
}

fn route_of(request: &Request<Body>) -> String {
    match request.extensions().get::<MatchedPath>() {
        Some(matched) => matched.as_str().to_string(),
        None => request.uri().path().to_string(),
    }
}

fn request_id_of(headers: &HeaderMap) -> String {
    headers
        .get(&REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

fn loggable_headers(headers: &HeaderMap) -> String {
    headers
        .iter()
        .filter(|(name, _)| LOGGED_HEADERS.contains(&name.as_str()))
        .map(|(name, value)| {
            let shown = if MASKED_HEADERS.contains(&name.as_str()) {
                "[REDACTED]"
            } else {
                value.to_str().unwrap_or("[invalid]")
            };
            format!("{}={}", name, shown)
        })
        .collect::<Vec<_>>()
        .join(", ")
}
