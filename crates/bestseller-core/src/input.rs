//! Parsing of free-form caller input (ids pasted as URLs, price boxes,
//! keyword lists) into the typed values a [`crate::QueryDescriptor`] needs.

use std::sync::LazyLock;

use regex::Regex;

use crate::InputError;

static SHOP_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/shop/(\d+)").expect("valid regex"));
static SHOP_PARAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:shopid|sellerid)=(\d+)").expect("valid regex"));
static CATEGORY_SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[._-]cat[._-]?(\d+)").expect("valid regex"));
static CATEGORY_PARAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:category|catid)=(\d+)").expect("valid regex"));

/// Resolves a shop id from a bare number, a `/shop/<id>` URL, or a URL with
/// a `shopid=`/`sellerid=` query parameter.
///
/// # Errors
///
/// Returns [`InputError::UnresolvableShop`] when no id can be found, or the
/// id is zero.
pub fn parse_shop_id(input: &str) -> Result<u64, InputError> {
    let trimmed = input.trim();
    let id = first_id(trimmed, &[&SHOP_PATH_RE, &SHOP_PARAM_RE]);
    match id {
        Some(id) if id > 0 => Ok(id),
        _ => Err(InputError::UnresolvableShop(trimmed.to_owned())),
    }
}

/// Resolves an optional category id. Blank input means "no category".
///
/// Accepts a bare number, a category slug URL (`.../Phones-cat.11036030`),
/// or a `category=`/`catid=` query parameter.
///
/// # Errors
///
/// Returns [`InputError::UnresolvableCategory`] when the input is non-blank
/// and no id can be found.
pub fn parse_category_id(input: &str) -> Result<Option<u64>, InputError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    first_id(trimmed, &[&CATEGORY_SLUG_RE, &CATEGORY_PARAM_RE])
        .map(Some)
        .ok_or_else(|| InputError::UnresolvableCategory(trimmed.to_owned()))
}

/// Parses an optional price bound. Blank input means "unbounded".
///
/// # Errors
///
/// Returns [`InputError::InvalidPrice`] for anything other than ASCII digits.
pub fn parse_price_bound(input: &str) -> Result<Option<u64>, InputError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InputError::InvalidPrice(trimmed.to_owned()));
    }
    trimmed
        .parse::<u64>()
        .map(Some)
        .map_err(|_| InputError::InvalidPrice(trimmed.to_owned()))
}

/// Splits a batch keyword block into one keyword per non-blank line.
#[must_use]
pub fn parse_keyword_lines(block: &str) -> Vec<String> {
    block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

fn first_id(input: &str, patterns: &[&Regex]) -> Option<u64> {
    if !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit()) {
        return input.parse().ok();
    }
    patterns
        .iter()
        .find_map(|re| re.captures(input))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
