//! Normalization from raw search items to [`bestseller_core::ProductRecord`].

use bestseller_core::ProductRecord;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::ScraperError;
use crate::types::RawItem;

/// Raw prices above this are taken to be in 1/100000 units.
const SUBUNIT_THRESHOLD: u64 = 100_000;
const LARGE_SUBUNIT_DIVISOR: u64 = 100_000;
const SMALL_SUBUNIT_DIVISOR: u64 = 100;

/// Picks the divisor that turns raw API prices into currency amounts.
///
/// Compatibility heuristic: the API carries no unit field, so the scale is
/// inferred from magnitude. An item whose real price sits near 1000 in a
/// `× 100` storefront is misread. One divisor is used for all three prices of
/// an item so a range never straddles two scales.
#[must_use]
pub fn price_divisor(max_raw_price: u64) -> u64 {
    if max_raw_price > SUBUNIT_THRESHOLD {
        LARGE_SUBUNIT_DIVISOR
    } else {
        SMALL_SUBUNIT_DIVISOR
    }
}

/// Unwraps and normalizes one element of a search response's `items` array.
///
/// # Errors
///
/// Returns [`ScraperError::MalformedRecord`] when the element (or its
/// `item_basic`) is not an object, does not decode, or lacks an identity.
pub fn normalize_search_item(
    element: Value,
    base_url: &str,
    query_label: &str,
) -> Result<ProductRecord, ScraperError> {
    let inner = match element {
        Value::Object(mut map) => match map.remove("item_basic") {
            Some(wrapped) => wrapped,
            None => Value::Object(map),
        },
        other => other,
    };

    if !inner.is_object() {
        return Err(ScraperError::MalformedRecord {
            reason: format!("expected an object, got {}", json_kind(&inner)),
        });
    }

    let raw: RawItem = serde_json::from_value(inner).map_err(|e| ScraperError::MalformedRecord {
        reason: e.to_string(),
    })?;
    normalize_item(raw, base_url, query_label)
}

/// Normalizes a decoded [`RawItem`].
///
/// Missing counts default to 0 and missing text to `""`. `price_min` and
/// `price_max` fall back to `price` when absent or zero.
///
/// # Errors
///
/// Returns [`ScraperError::MalformedRecord`] if `itemid` or `shopid` is
/// missing or zero.
pub fn normalize_item(
    raw: RawItem,
    base_url: &str,
    query_label: &str,
) -> Result<ProductRecord, ScraperError> {
    let item_id = required_id(raw.itemid, "itemid")?;
    let shop_id = required_id(raw.shopid, "shopid")?;

    let price_raw = raw.price.unwrap_or(0);
    let price_min_raw = raw.price_min.filter(|v| *v != 0).unwrap_or(price_raw);
    let price_max_raw = raw.price_max.filter(|v| *v != 0).unwrap_or(price_raw);
    let divisor = Decimal::from(price_divisor(
        price_raw.max(price_min_raw).max(price_max_raw),
    ));
    let scale = |v: u64| Decimal::from(v) / divisor;

    let (rating, rating_count) = raw.item_rating.map_or((0.0, 0), |r| {
        let count = r
            .rating_count
            .unwrap_or_default()
            .into_iter()
            .map(Option::unwrap_or_default)
            .fold(0u64, u64::saturating_add);
        (r.rating_star.unwrap_or(0.0), count)
    });

    Ok(ProductRecord {
        title: raw.name.unwrap_or_default(),
        item_id,
        shop_id,
        shop_name: None,
        price: scale(price_raw),
        price_min: scale(price_min_raw),
        price_max: scale(price_max_raw),
        currency: raw.currency.unwrap_or_default(),
        historical_sold: raw.historical_sold.unwrap_or(0),
        recent_sold: raw.sold,
        rating,
        rating_count,
        stock: raw.stock.unwrap_or(0),
        url: product_url(base_url, shop_id, item_id),
        query_label: query_label.to_owned(),
    })
}

/// Storefront product page for an item. No network call.
#[must_use]
pub fn product_url(base_url: &str, shop_id: u64, item_id: u64) -> String {
    format!(
        "{}/product/{shop_id}/{item_id}",
        base_url.trim_end_matches('/')
    )
}

fn required_id(id: Option<u64>, field: &str) -> Result<u64, ScraperError> {
    id.filter(|v| *v != 0)
        .ok_or_else(|| ScraperError::MalformedRecord {
            reason: format!("missing {field}"),
        })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
