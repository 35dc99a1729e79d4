//! Paged read access to the remote row-store.

use async_trait::async_trait;

use crate::error::FetchResult;
use crate::types::record::RawSalesRow;

/// A table that can be read a window at a time.
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Up to `limit` rows starting at `offset`, projecting `fields`.
    ///
    /// A page shorter than `limit` means the table is exhausted.
    async fn select(
        &self,
        fields: &str,
        offset: usize,
        limit: usize,
    ) -> FetchResult<Vec<RawSalesRow>>;
}
