pub mod app_config;
pub mod cancel;
pub mod config;
pub mod error;
pub mod input;
pub mod products;
pub mod query;

pub use app_config::{AppConfig, KNOWN_DOMAINS};
pub use cancel::StopSignal;
pub use config::{load_app_config, load_app_config_from_env, parse_domain};
pub use error::{ConfigError, InputError};
pub use input::{parse_category_id, parse_keyword_lines, parse_price_bound, parse_shop_id};
pub use products::ProductRecord;
pub use query::{QueryDescriptor, QueryTarget, SearchFilters};
