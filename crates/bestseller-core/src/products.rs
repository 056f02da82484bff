use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One best-seller listing, normalized from the marketplace search API.
///
/// `(shop_id, item_id)` identifies the product across queries; see
/// [`ProductRecord::identity`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub title: String,
    /// Marketplace item id, unique within a shop.
    pub item_id: u64,
    pub shop_id: u64,
    /// Display name of the shop. Filled in after pagination by the shop-name
    /// lookup; `None` when lookups are disabled, skipped, or failed.
    pub shop_name: Option<String>,
    pub price: Decimal,
    pub price_min: Decimal,
    pub price_max: Decimal,
    /// Currency code as reported by the API, e.g. `"THB"`. May be empty.
    pub currency: String,
    /// Lifetime units sold. Primary ranking key.
    pub historical_sold: u64,
    /// Recent-window units sold, when the API reports it. Ranking tie-break.
    pub recent_sold: Option<u64>,
    /// Average star rating, 0–5.
    pub rating: f64,
    /// Sum of all rating-bucket counts.
    pub rating_count: u64,
    pub stock: u64,
    /// Storefront product page, e.g. `"https://shopee.co.th/product/5/9"`.
    pub url: String,
    /// Label of the query that produced this row.
    pub query_label: String,
}

impl ProductRecord {
    /// Deduplication key across queries.
    #[must_use]
    pub fn identity(&self) -> (u64, u64) {
        (self.shop_id, self.item_id)
    }

    /// Ranking key: `(historical_sold, recent_sold or 0)`, compared descending.
    #[must_use]
    pub fn rank_key(&self) -> (u64, u64) {
        (self.historical_sold, self.recent_sold.unwrap_or(0))
    }

    /// `"12.50 - 30.00 THB"` for a price range, `"12.50 THB"` otherwise.
    #[must_use]
    pub fn price_display(&self) -> String {
        let text = if self.price_min == self.price_max {
            format!("{:.2}", self.price)
        } else {
            format!("{:.2} - {:.2}", self.price_min, self.price_max)
        };
        if self.currency.is_empty() {
            text
        } else {
            format!("{text} {}", self.currency)
        }
    }

    /// `"4.80 / 120 reviews"`, or just `"4.80"` when there are no ratings.
    #[must_use]
    pub fn rating_display(&self) -> String {
        if self.rating_count > 0 {
            format!("{:.2} / {} reviews", self.rating, self.rating_count)
        } else {
            format!("{:.2}", self.rating)
        }
    }
}
