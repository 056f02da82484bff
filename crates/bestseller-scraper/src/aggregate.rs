//! Cross-query merge, deduplication, and ranking.

use std::collections::HashSet;

use bestseller_core::ProductRecord;

/// Merges per-query result lists into the final ranked sequence.
///
/// Lists are concatenated in run order, then deduplicated by
/// [`ProductRecord::identity`] keeping the first occurrence: a product found
/// under two keywords is attributed to the query that reached it first.
/// The survivors are sorted by [`ProductRecord::rank_key`], descending.
/// The sort is stable, so full ties keep their post-dedup order.
#[must_use]
pub fn merge_ranked<I>(per_query: I) -> Vec<ProductRecord>
where
    I: IntoIterator<Item = Vec<ProductRecord>>,
{
    let mut records = dedup_by_identity(per_query.into_iter().flatten());
    rank(&mut records);
    records
}

/// Keeps the first record seen for each `(shop_id, item_id)`.
#[must_use]
pub fn dedup_by_identity<I>(records: I) -> Vec<ProductRecord>
where
    I: IntoIterator<Item = ProductRecord>,
{
    let mut seen: HashSet<(u64, u64)> = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.identity()))
        .collect()
}

/// Stable sort, best sellers first.
pub fn rank(records: &mut [ProductRecord]) {
    records.sort_by(|a, b| b.rank_key().cmp(&a.rank_key()));
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn record(shop_id: u64, item_id: u64, sold: u64, recent: Option<u64>, label: &str) -> ProductRecord {
        ProductRecord {
            title: format!("item {item_id}"),
            item_id,
            shop_id,
            shop_name: None,
            price: Decimal::ONE,
            price_min: Decimal::ONE,
            price_max: Decimal::ONE,
            currency: "THB".to_owned(),
            historical_sold: sold,
            recent_sold: recent,
            rating: 0.0,
            rating_count: 0,
            stock: 0,
            url: format!("https://shopee.co.th/product/{shop_id}/{item_id}"),
            query_label: label.to_owned(),
        }
    }

    #[test]
    fn duplicate_identity_keeps_first_in_list_order() {
        let merged = merge_ranked(vec![
            vec![record(5, 9, 100, None, "phone case")],
            vec![record(5, 9, 100, None, "iphone case")],
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].query_label, "phone case");
    }

    #[test]
    fn same_item_id_in_different_shops_is_not_a_duplicate() {
        let merged = merge_ranked(vec![vec![
            record(1, 9, 10, None, "q"),
            record(2, 9, 10, None, "q"),
        ]]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn sorts_by_historical_then_recent_sold() {
        let merged = merge_ranked(vec![vec![
            record(1, 1, 50, None, "q"),
            record(1, 2, 200, Some(10), "q"),
            record(1, 3, 200, Some(30), "q"),
        ]]);
        let order: Vec<(u64, Option<u64>)> = merged
            .iter()
            .map(|r| (r.historical_sold, r.recent_sold))
            .collect();
        assert_eq!(order, vec![(200, Some(30)), (200, Some(10)), (50, None)]);
    }

    #[test]
    fn missing_recent_sold_ranks_as_zero() {
        let merged = merge_ranked(vec![vec![
            record(1, 1, 200, None, "q"),
            record(1, 2, 200, Some(1), "q"),
            record(1, 3, 200, Some(0), "q"),
        ]]);
        let ids: Vec<u64> = merged.iter().map(|r| r.item_id).collect();
        // item 1 (None) and item 3 (Some(0)) tie; stable sort keeps input order.
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn full_ties_keep_merge_order_across_queries() {
        let merged = merge_ranked(vec![
            vec![record(1, 1, 10, Some(1), "a"), record(1, 2, 10, Some(1), "a")],
            vec![record(1, 3, 10, Some(1), "b")],
        ]);
        let ids: Vec<u64> = merged.iter().map(|r| r.item_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn merging_twice_is_idempotent() {
        let input = vec![
            vec![record(5, 9, 3, None, "a"), record(1, 1, 40, Some(2), "a")],
            vec![record(5, 9, 3, None, "b"), record(2, 2, 40, Some(7), "b")],
        ];
        let once = merge_ranked(input);
        let twice = merge_ranked(vec![once.clone()]);
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(merge_ranked(Vec::<Vec<ProductRecord>>::new()).is_empty());
    }
}
