//! Marketplace API response shapes.
//!
//! ## Observed shape of `search_items`
//!
//! ### Item wrapping
//! Each element of `items` is either the item object itself or an envelope
//! with the item under `item_basic`. Unwrapping happens in
//! [`crate::normalize::normalize_search_item`], so elements are kept as raw
//! `serde_json::Value`s until then and a single malformed element cannot fail
//! a whole page.
//!
//! ### Prices
//! Integers in an undocumented subunit (observed as `× 100000` on most
//! storefronts, `× 100` on some). No unit field is present. `price_min` and
//! `price_max` are absent or `0` on single-price items.
//!
//! ### `sold` vs `historical_sold`
//! `historical_sold` is lifetime units; `sold` is a recent-window count that
//! some storefronts omit entirely.
//!
//! ### `item_rating.rating_count`
//! An array of six counts: total-or-misc followed by 1–5 stars on some
//! storefronts, 1–5 stars plus a trailing bucket on others. Entries may be
//! `null`. Only the sum is used.

use serde::Deserialize;

/// One product as reported by the search API. Every field is optional; the
/// normalizer decides what is required.
#[derive(Debug, Default, Deserialize)]
pub struct RawItem {
    #[serde(default)]
    pub itemid: Option<u64>,
    #[serde(default)]
    pub shopid: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<u64>,
    #[serde(default)]
    pub price_min: Option<u64>,
    #[serde(default)]
    pub price_max: Option<u64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub historical_sold: Option<u64>,
    /// Recent-window sales. `None` when the storefront does not report it.
    #[serde(default)]
    pub sold: Option<u64>,
    #[serde(default)]
    pub item_rating: Option<RawItemRating>,
    #[serde(default)]
    pub stock: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawItemRating {
    #[serde(default)]
    pub rating_star: Option<f64>,
    #[serde(default)]
    pub rating_count: Option<Vec<Option<u64>>>,
}

/// Response from `GET /api/v4/shop/get_shop_detail`.
#[derive(Debug, Default, Deserialize)]
pub struct ShopDetailResponse {
    #[serde(default)]
    pub data: Option<ShopDetail>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ShopDetail {
    #[serde(default)]
    pub name: Option<String>,
}

impl ShopDetailResponse {
    /// The shop's display name, when present and non-blank.
    #[must_use]
    pub fn into_name(self) -> Option<String> {
        self.data
            .and_then(|d| d.name)
            .map(|n| n.trim().to_owned())
            .filter(|n| !n.is_empty())
    }
}
