// src/handlers/health.rs

use axum::{Json, response::IntoResponse};
use serde_json::json;

/// Root endpoint.
#[utoipa::path(get, path = "/", tag = "health", responses((status = 200, description = "Welcome message")))]
pub async fn root() -> impl IntoResponse {
    Json(json!({ "message": "Welcome to the Survey API" }))
}

/// Health check endpoint for load balancers.
#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is healthy")))]
pub async fn health_check() -> impl IntoResponse {
    tracing::debug!("Health check requested");
    Json(json!({ "message": "Service is healthy" }))
}
