//! Health check endpoint.

use axum::http::StatusCode;
use axum::response::IntoResponse;

/// Handler for `GET /health`.
///
/// Returns 200 whenever the server is up; liveness probes need nothing
/// deeper than that.
pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
