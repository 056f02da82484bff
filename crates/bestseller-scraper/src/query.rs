//! Query parameters for one page of a `search_items` request.
//!
//! The API always sorts by sales, descending. That order only decides which
//! items are fetched first; final ranking happens in [`crate::aggregate`].

use bestseller_core::{QueryDescriptor, QueryTarget};

pub const SEARCH_PATH: &str = "/api/v4/search/search_items";
pub const SHOP_DETAIL_PATH: &str = "/api/v4/shop/get_shop_detail";

const SORT_BY: &str = "sales";
const SORT_ORDER: &str = "desc";
const API_VERSION: &str = "2";
const KEYWORD_SCENARIO: &str = "PAGE_GLOBAL_SEARCH";

/// Offset of the first item on `page` (0-based), sent as `newest`.
#[must_use]
pub fn page_offset(page: u32, page_size: u32) -> u64 {
    u64::from(page) * u64::from(page_size)
}

/// Builds the exact parameter list for `page` of `query`.
///
/// Keyword searches carry `price_min`, `price_max`, and `match_id` only when
/// the corresponding filter is set. Shop searches are scoped by `shopid` and
/// carry no filters.
#[must_use]
pub fn search_params(query: &QueryDescriptor, page: u32) -> Vec<(&'static str, String)> {
    let limit = query.page_size.to_string();
    let newest = page_offset(page, query.page_size).to_string();

    match &query.target {
        QueryTarget::Keyword { keyword, filters } => {
            let mut params = vec![
                ("by", SORT_BY.to_owned()),
                ("keyword", keyword.clone()),
                ("limit", limit),
                ("newest", newest),
                ("order", SORT_ORDER.to_owned()),
                ("page_type", "search".to_owned()),
                ("scenario", KEYWORD_SCENARIO.to_owned()),
                ("version", API_VERSION.to_owned()),
            ];
            if let Some(min) = filters.price_min {
                params.push(("price_min", min.to_string()));
            }
            if let Some(max) = filters.price_max {
                params.push(("price_max", max.to_string()));
            }
            if let Some(category) = filters.category_id {
                params.push(("match_id", category.to_string()));
            }
            params
        }
        QueryTarget::Shop { shop_id } => vec![
            ("by", SORT_BY.to_owned()),
            ("limit", limit),
            ("newest", newest),
            ("order", SORT_ORDER.to_owned()),
            ("page_type", "shop".to_owned()),
            ("shopid", shop_id.to_string()),
            ("version", API_VERSION.to_owned()),
        ],
    }
}

/// Parameters for a shop-detail lookup.
#[must_use]
pub fn shop_detail_params(shop_id: u64) -> Vec<(&'static str, String)> {
    vec![("shopid", shop_id.to_string())]
}
