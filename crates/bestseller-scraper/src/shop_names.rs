//! Best-effort shop display names, cached for the length of one run.

use std::collections::{BTreeSet, HashMap};

use bestseller_core::{ProductRecord, StopSignal};

use crate::client::MarketplaceClient;

/// Shop id → display name. An empty string marks a shop that was looked up
/// and had no name available, so it is not looked up again.
#[derive(Debug, Default)]
pub struct ShopNameCache {
    names: HashMap<u64, String>,
}

impl ShopNameCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up every shop in `shop_ids` not already cached, in ascending id
    /// order, pausing the client's lookup delay after each one.
    ///
    /// Lookup failures are never propagated. Stops early when `stop` is set.
    /// Returns the number of lookups issued.
    pub async fn resolve<I>(
        &mut self,
        client: &MarketplaceClient,
        shop_ids: I,
        stop: &StopSignal,
    ) -> usize
    where
        I: IntoIterator<Item = u64>,
    {
        let pending: BTreeSet<u64> = shop_ids
            .into_iter()
            .filter(|id| !self.names.contains_key(id))
            .collect();

        let mut lookups = 0usize;
        for shop_id in pending {
            if stop.is_stopped() {
                tracing::info!(lookups, "stop requested — ending shop name lookups");
                break;
            }
            let name = client.shop_name(shop_id, stop).await.unwrap_or_default();
            self.names.insert(shop_id, name);
            lookups += 1;

            if !client.shop_lookup_delay.is_zero() {
                tokio::time::sleep(client.shop_lookup_delay).await;
            }
        }
        lookups
    }

    /// The cached name for `shop_id`, if one was found.
    #[must_use]
    pub fn name(&self, shop_id: u64) -> Option<&str> {
        self.names
            .get(&shop_id)
            .map(String::as_str)
            .filter(|n| !n.is_empty())
    }

    pub fn insert(&mut self, shop_id: u64, name: impl Into<String>) {
        self.names.insert(shop_id, name.into());
    }

    /// Sets `shop_name` on every record whose shop has a known name. Other
    /// records keep `None`.
    pub fn backfill(&self, records: &mut [ProductRecord]) {
        for record in records {
            if let Some(name) = self.name(record.shop_id) {
                record.shop_name = Some(name.to_owned());
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
