use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use crate::models::ShortLink;
use crate::shortener::codegen::{attempt, random_code};
use crate::shortener::normalize::normalize_url;
use crate::storage::{LinkStore, StoreError};

/// Fresh codes drawn before allocation gives up. With a saturated code
/// space the fix is a longer `CODE_LENGTH`, not a bigger budget.
pub const MAX_CODE_ATTEMPTS: u32 = 10;

#[derive(Debug, Error)]
pub enum ShortenerError {
    #[error("url must not be empty")]
    InvalidUrl,
    #[error("retry budget exhausted while allocating a short code")]
    AllocationExhausted,
    #[error("short link not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Code allocation and resolution engine on top of a [`LinkStore`].
///
/// Holds no locks; correctness under concurrent requests comes entirely
/// from the store's unique indexes on `code` and `url`.
pub struct Shortener {
    store: Arc<dyn LinkStore>,
    code_length: usize,
}

impl Shortener {
    pub fn new(store: Arc<dyn LinkStore>, code_length: usize) -> Self {
        Self { store, code_length }
    }

    /// Returns the link for `raw`, minting a fresh code on first sight.
    ///
    /// Two concurrent requests for the same new URL may both miss the
    /// initial lookup and race to insert; the unique index on `url` lets
    /// exactly one win, and the loser re-reads the winner's record. The
    /// same normalized URL therefore never maps to two codes.
    pub async fn shorten(&self, raw: &str) -> Result<ShortLink, ShortenerError> {
        let url = normalize_url(raw);
        if url.is_empty() {
            return Err(ShortenerError::InvalidUrl);
        }

        if let Some(existing) = self.store.find_by_url(&url).await? {
            return Ok(existing);
        }

        self.allocate(&url).await
    }

    /// Resolves `code` to its stored link, bumping the visit counter.
    ///
    /// The increment is non-fatal to the redirect: a failed counter
    /// update is logged and the caller still gets the URL.
    pub async fn resolve(&self, code: &str) -> Result<ShortLink, ShortenerError> {
        let link = self
            .store
            .find_by_code(code)
            .await?
            .ok_or(ShortenerError::NotFound)?;

        if let Err(err) = self.store.increment_visits(code).await {
            warn!(code = %link.code, error = %err, "failed to increment visit count");
        }

        Ok(link)
    }

    async fn allocate(&self, url: &str) -> Result<ShortLink, ShortenerError> {
        let outcome = attempt(MAX_CODE_ATTEMPTS, move || async move {
            let code = random_code(self.code_length);
            match self.store.insert(&code, url).await {
                Ok(link) => Ok(Some(link)),
                // Another allocation grabbed this code; draw again.
                Err(StoreError::CodeExists) => Ok(None),
                // A concurrent request inserted the same URL first; hand
                // back the winner's record instead of erroring.
                Err(StoreError::UrlExists) => {
                    let winner = self.store.find_by_url(url).await?.ok_or_else(|| {
                        ShortenerError::Storage(anyhow::anyhow!(
                            "url missing right after unique violation"
                        ))
                    })?;
                    Ok(Some(winner))
                }
                Err(StoreError::Other(e)) => Err(ShortenerError::Storage(e)),
            }
        })
        .await?;

        outcome.ok_or(ShortenerError::AllocationExhausted)
    }
}
