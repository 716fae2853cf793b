//! Cover provider trait
//!
//! Abstracts external cover sources (store APIs, scrapers, local indexes).
//! The resolver tries providers in the order it was given them and stops
//! at the first hit.

use crate::error::Result;
use async_trait::async_trait;

/// A single external source of cover art
#[async_trait]
pub trait CoverProvider: Send + Sync {
    /// Provider name, for logs
    fn name(&self) -> &str;

    /// Look up a cover URL for an artist/title pair
    ///
    /// # Returns
    /// * `Ok(Some(url))` - This provider has a cover
    /// * `Ok(None)` - This provider definitively has no cover
    /// * `Err(_)` - Transient failure; the answer is unknown
    async fn lookup(&self, artist: &str, title: &str) -> Result<Option<String>>;
}
