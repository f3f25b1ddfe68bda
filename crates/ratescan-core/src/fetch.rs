//! The content-fetch collaborator interface.
//!
//! Fetching is external to the cascade. Implementations are injected into
//! the pipeline rather than held as ambient state, so per-product
//! extraction stays independently runnable and testable with canned
//! content.

use std::future::Future;

use crate::error::FetchError;
use crate::models::config::ProductConfig;
use crate::models::content::RawContent;

/// A collaborator that retrieves raw page content for a product.
pub trait ContentFetcher {
    /// Retrieve the raw content behind a product's configured URL.
    fn fetch(
        &self,
        product: &ProductConfig,
    ) -> impl Future<Output = Result<RawContent, FetchError>> + Send;
}
