//! Caller-supplied descriptions of one search.

use serde::{Deserialize, Serialize};

use crate::InputError;

pub const DEFAULT_PAGE_SIZE: u32 = 60;
pub const DEFAULT_MAX_PAGES: u32 = 3;

/// Optional narrowing for keyword searches. `None` fields are never sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Inclusive lower price bound, passed to the API as-is.
    pub price_min: Option<u64>,
    /// Inclusive upper price bound, passed to the API as-is.
    pub price_max: Option<u64>,
    pub category_id: Option<u64>,
}

/// What a query searches: a keyword across the marketplace, or one shop's
/// catalog. Shop searches take no filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum QueryTarget {
    Keyword {
        keyword: String,
        #[serde(default)]
        filters: SearchFilters,
    },
    Shop {
        shop_id: u64,
    },
}

/// One search plus its limits. Results are always fetched best-selling first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDescriptor {
    pub target: QueryTarget,
    /// Tag written to every record this query produces.
    pub label: String,
    pub page_size: u32,
    /// Upper bound on pages fetched; fewer are fetched when results run out.
    pub max_pages: u32,
    /// Records with `historical_sold` below this are dropped.
    pub min_sold: u64,
    pub resolve_shop_names: bool,
}

impl QueryDescriptor {
    /// Keyword search labelled with the keyword itself.
    #[must_use]
    pub fn keyword(keyword: impl Into<String>, filters: SearchFilters) -> Self {
        let keyword = keyword.into().trim().to_owned();
        Self::with_target(
            keyword.clone(),
            QueryTarget::Keyword { keyword, filters },
        )
    }

    /// Shop catalog search labelled `shop:<id>`.
    #[must_use]
    pub fn shop(shop_id: u64) -> Self {
        Self::with_target(format!("shop:{shop_id}"), QueryTarget::Shop { shop_id })
    }

    fn with_target(label: String, target: QueryTarget) -> Self {
        Self {
            target,
            label,
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            min_sold: 0,
            resolve_shop_names: true,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    #[must_use]
    pub fn with_min_sold(mut self, min_sold: u64) -> Self {
        self.min_sold = min_sold;
        self
    }

    #[must_use]
    pub fn with_shop_names(mut self, resolve: bool) -> Self {
        self.resolve_shop_names = resolve;
        self
    }

    /// Checks the descriptor before any request is made.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::InvalidQuery`] for an empty keyword, a zero shop
    /// id, zero pages or page size, or an inverted price range.
    pub fn validate(&self) -> Result<(), InputError> {
        let invalid = |reason: &str| InputError::InvalidQuery {
            label: self.label.clone(),
            reason: reason.to_owned(),
        };

        match &self.target {
            QueryTarget::Keyword { keyword, filters } => {
                if keyword.trim().is_empty() {
                    return Err(invalid("keyword is empty"));
                }
                if let (Some(min), Some(max)) = (filters.price_min, filters.price_max) {
                    if min > max {
                        return Err(invalid("price_min is greater than price_max"));
                    }
                }
            }
            QueryTarget::Shop { shop_id } => {
                if *shop_id == 0 {
                    return Err(invalid("shop id must be non-zero"));
                }
            }
        }

        if self.max_pages == 0 {
            return Err(invalid("max_pages must be at least 1"));
        }
        if self.page_size == 0 {
            return Err(invalid("page_size must be at least 1"));
        }
        Ok(())
    }
}
