//! Paginated read of the full row set.

use tracing::{debug, info};

use crate::error::FetchResult;
use crate::traits::row_source::RowSource;
use crate::types::record::RawSalesRow;

/// Rows requested per page.
pub const PAGE_SIZE: usize = 1000;

/// Upper bound on rows read per fetch when `MAX_RECORDS` is unset.
pub const DEFAULT_MAX_RECORDS: usize = 10_000;

/// Read pages of [`PAGE_SIZE`] until a short page or `max_records` rows.
///
/// Any failing page aborts the whole fetch; partial row sets are never
/// returned. An empty vector means the table has no rows.
pub async fn fetch_all(
    source: &dyn RowSource,
    fields: &str,
    max_records: usize,
) -> FetchResult<Vec<RawSalesRow>> {
    let mut rows: Vec<RawSalesRow> = Vec::new();
    let mut pages = 0usize;

    while rows.len() < max_records {
        let offset = rows.len();
        let requested = PAGE_SIZE.min(max_records - offset);

        let mut page = source.select(fields, offset, requested).await?;
        pages += 1;
        page.truncate(requested);

        let received = page.len();
        debug!(offset, requested, received, "Fetched row page");
        rows.extend(page);

        if received < requested {
            break;
        }
    }

    info!(rows = rows.len(), pages, max_records, "Row set fetched");
    Ok(rows)
}
