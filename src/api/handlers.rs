use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::config::Config;
use crate::models::{ErrorResponse, ShortenRequest, ShortenResponse};
use crate::shortener::{Shortener, ShortenerError};

pub struct AppState {
    pub shortener: Shortener,
    pub config: Arc<Config>,
}

/// Create (or look up) a short link for the submitted URL
pub async fn shorten(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<ShortenRequest>,
) -> Result<Json<ShortenResponse>, (StatusCode, Json<ErrorResponse>)> {
    let link = match state.shortener.shorten(&payload.url).await {
        Ok(link) => link,
        Err(ShortenerError::InvalidUrl) => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "url must not be empty".to_string(),
                }),
            ));
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to shorten url");
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "failed to create short link".to_string(),
                }),
            ));
        }
    };

    let short_url = build_short_url(&state.config, &headers, &link.code);

    Ok(Json(ShortenResponse {
        code: link.code,
        short_url,
        url: link.url,
        visit_count: link.visit_count,
    }))
}

/// `http://{domain}{base_path}{code}`, falling back to the request's
/// Host header when no domain is configured.
fn build_short_url(config: &Config, headers: &HeaderMap, code: &str) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    let domain = if config.domain.is_empty() {
        host
    } else {
        config.domain.as_str()
    };
    format!("http://{}{}{}", domain, config.base_path, code)
}

/// Redirect to the stored URL, counting the visit
pub async fn redirect_to_url(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Response {
    match state.shortener.resolve(&code).await {
        Ok(link) => {
            (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, link.url)]).into_response()
        }
        Err(ShortenerError::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "short link not found".to_string(),
            }),
        )
            .into_response(),
        Err(err) => {
            tracing::error!(code = %code, error = %err, "failed to resolve short link");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "internal server error".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    #[derive(Serialize)]
    struct HealthResponse {
        status: String,
    }

    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
