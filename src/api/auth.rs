use axum::{
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::models::ErrorResponse;

/// Exact-equality API key check. This is a shared-secret gate, not an
/// authentication protocol.
pub struct ApiKeyGuard {
    key: Option<String>,
}

impl ApiKeyGuard {
    /// An empty configured key disables the check entirely.
    pub fn new(key: &str) -> Self {
        Self {
            key: if key.is_empty() {
                None
            } else {
                Some(key.to_string())
            },
        }
    }

    pub fn validate(&self, headers: &HeaderMap) -> bool {
        let Some(expected) = self.key.as_deref() else {
            return true;
        };
        extract_api_key(headers).as_deref() == Some(expected)
    }
}

/// Pulls the caller's key from `X-API-Key`, falling back to the
/// `Authorization` header with or without a `Bearer ` prefix.
fn extract_api_key(headers: &HeaderMap) -> Option<String> {
    if let Some(key) = headers.get("X-API-Key").and_then(|h| h.to_str().ok()) {
        if !key.is_empty() {
            return Some(key.to_string());
        }
    }

    let auth = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let key = auth.strip_prefix("Bearer ").unwrap_or(auth).trim();
    if key.is_empty() {
        None
    } else {
        Some(key.to_string())
    }
}

pub async fn api_key_middleware(
    guard: Arc<ApiKeyGuard>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Response {
    if guard.validate(&headers) {
        next.run(request).await
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "invalid API key".to_string(),
            }),
        )
            .into_response()
    }
}
