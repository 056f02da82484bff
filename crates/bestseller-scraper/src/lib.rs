pub mod acquisition;
pub mod aggregate;
pub mod client;
pub mod error;
pub mod normalize;
pub mod query;
pub mod rate_limit;
pub mod shop_names;
pub mod types;

pub use acquisition::{run_acquisition, spawn_acquisition, AcquisitionReport, Progress, RunStatus};
pub use aggregate::merge_ranked;
pub use client::{ClientSettings, MarketplaceClient};
pub use error::ScraperError;
pub use normalize::{normalize_item, normalize_search_item};
pub use rate_limit::RetryPolicy;
pub use shop_names::ShopNameCache;
pub use types::{RawItem, RawItemRating, ShopDetailResponse};
