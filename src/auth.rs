//! # auth — API Key Middleware
//!
//! Guards the adapter with an `X-API-Key` header.
//!
//! ## Mode
//! - `API_KEY` unset (or empty) → **Allow All** (dev mode)
//! - `API_KEY` set → every request must send `X-API-Key: <key>`
//!
//! `/health` is always open.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

use crate::state::SharedState;

pub async fn require_api_key(
    State(state): State<SharedState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = state.api_key.as_deref() else {
        return next.run(request).await;
    };

    let path = request.uri().path();
    if path == "/health" {
        return next.run(request).await;
    }

    let provided = request
        .headers()
        .get("X-API-Key")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if provided == expected {
        next.run(request).await
    } else {
        warn!(path, "❌ Unauthorized request — invalid or missing X-API-Key");
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({
                "ok":     false,
                "error":  "UNAUTHORIZED",
                "status": "Unauthorized: invalid or missing X-API-Key header",
            })),
        )
            .into_response()
    }
}
