use crate::models::ShortLink;
use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("code already exists")]
    CodeExists,
    #[error("url already exists")]
    UrlExists,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Initialize the storage (create tables, etc.)
    async fn init(&self) -> Result<()>;

    /// Insert a new link with `visit_count` 0. Uniqueness of both `code`
    /// and `url` is enforced by the store itself, not by a prior lookup;
    /// a violated index surfaces as `CodeExists` or `UrlExists`.
    async fn insert(&self, code: &str, url: &str) -> StoreResult<ShortLink>;

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>>;

    async fn find_by_url(&self, url: &str) -> Result<Option<ShortLink>>;

    /// Bump the visit counter in a single atomic update; concurrent
    /// resolutions of the same code must not lose increments.
    async fn increment_visits(&self, code: &str) -> Result<()>;
}
