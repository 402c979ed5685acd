// src/utils/request_log.rs

use std::time::Instant;

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Axum Middleware: request logging.
///
/// Tags every request with a fresh UUID, logs start and completion with the
/// elapsed time, and echoes the id back in the `x-request-id` header.
pub async fn log_requests(req: Request<Body>, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let start = Instant::now();

    tracing::info!("Request {} started: {} {}", request_id, method, path);

    let mut response = next.run(req).await;

    let elapsed = start.elapsed().as_secs_f64();
    if response.status().is_server_error() {
        tracing::error!(
            "Request {} failed: {} in {:.4}s",
            request_id,
            response.status().as_u16(),
            elapsed
        );
    } else {
        tracing::info!(
            "Request {} completed: {} in {:.4}s",
            request_id,
            response.status().as_u16(),
            elapsed
        );
    }

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
