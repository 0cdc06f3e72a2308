use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored short link. Immutable after creation except for
/// `visit_count`, which only the resolve path bumps.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShortLink {
    pub id: i64,
    pub code: String,
    /// Normalized destination URL.
    pub url: String,
    pub visit_count: i64,
    /// Unix timestamp in seconds.
    pub created_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub code: String,
    pub short_url: String,
    pub url: String,
    pub visit_count: i64,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
