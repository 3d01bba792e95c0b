//! Slowdown middleware for testing
#![allow(dead_code)] // Feature-gated middleware

use axum::body::Body;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::IntoResponse;
use std::time::Duration;

/// Middleware that delays every request, to surface client races and loading
/// states that a local server answers too quickly to reveal.
pub async fn slowdown_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    tokio::time::sleep(Duration::from_millis(750)).await;
    next.run(request).await
}
