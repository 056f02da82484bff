//! Multi-page fetch loop for `MarketplaceClient`.

use bestseller_core::{ProductRecord, QueryDescriptor, StopSignal};

use crate::error::ScraperError;
use crate::normalize::normalize_search_item;

use super::MarketplaceClient;

impl MarketplaceClient {
    /// Fetches and normalizes every page of `query`, up to `max_pages`.
    ///
    /// Stops early on an empty page (results exhausted) or when `stop` is set.
    /// Sleeps the page delay after every fetched page, including the last.
    /// Elements that fail normalization are skipped; records below
    /// `min_sold` are dropped. Returned records are in fetch order, without
    /// deduplication or shop names.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidQuery`] if `query` fails validation; no request
    ///   is made.
    /// - [`ScraperError::Network`] if a page fetch exhausts its retries. Records
    ///   from earlier pages are discarded.
    pub async fn fetch_query(
        &self,
        query: &QueryDescriptor,
        stop: &StopSignal,
    ) -> Result<Vec<ProductRecord>, ScraperError> {
        query.validate()?;

        let mut records: Vec<ProductRecord> = Vec::new();

        for page in 0..query.max_pages {
            if stop.is_stopped() {
                tracing::info!(label = %query.label, page, "stop requested — ending pagination");
                break;
            }

            let items = self.search_page(query, page, stop).await?;
            if items.is_empty() {
                tracing::debug!(label = %query.label, page, "empty page — results exhausted");
                break;
            }

            let fetched = items.len();
            let mut skipped = 0usize;
            let mut below_min_sold = 0usize;

            for element in items {
                match normalize_search_item(element, &self.base_url, &query.label) {
                    Ok(record) if record.historical_sold >= query.min_sold => records.push(record),
                    Ok(_) => below_min_sold += 1,
                    Err(e) => {
                        skipped += 1;
                        tracing::debug!(label = %query.label, page, error = %e, "skipping search item");
                    }
                }
            }

            tracing::debug!(
                label = %query.label,
                page,
                fetched,
                skipped,
                below_min_sold,
                total = records.len(),
                "fetched search page"
            );

            if !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }
        }

        Ok(records)
    }
}
