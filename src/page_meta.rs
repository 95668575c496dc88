//! Pagination metadata resolver.
//!
//! Backends report paging in several mutually inconsistent shapes (`total`
//! vs `totalElements` vs `totalPages × size`, `page` vs `number`, ...).
//! [`resolve_page_meta`] reconciles whatever arrived into a canonical
//! page/size/total triple, falling back to the previously known values and
//! an inline item count. Pure and total: malformed input degrades through
//! the fallback chain, it never panics.

#[cfg(test)]
#[path = "page_meta_test.rs"]
mod page_meta_test;

use serde_json::Value;

const SIZE_KEYS: [&str; 2] = ["size", "pageSize"];
const PAGE_KEYS: [&str; 3] = ["page", "pageNumber", "number"];
const TOTAL_KEYS: [&str; 5] = ["total", "totalElements", "count", "totalItems", "totalRecords"];
const TOTAL_PAGES_KEYS: [&str; 3] = ["totalPages", "pages", "pageCount"];

/// Canonical description of a paginated result set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PageMeta {
    pub page: u64,
    pub size: u64,
    pub total: u64,
}

/// Resolve paging metadata from a raw response fragment.
///
/// Per output field the first recognized alias that coerces to a usable
/// number wins, else the previous value from `current`. `total` prefers an
/// explicit count field; the derived `totalPages × size` is used only when
/// no explicit count is present and both factors are strictly positive,
/// and `fallback_count` (e.g. the length of an inline data array) covers
/// the rest.
#[must_use]
pub fn resolve_page_meta(raw: &Value, fallback_count: u64, current: &PageMeta) -> PageMeta {
    let size = first_number(raw, &SIZE_KEYS).unwrap_or(current.size);
    let page = first_number(raw, &PAGE_KEYS).unwrap_or(current.page);
    let total = match first_number(raw, &TOTAL_KEYS) {
        Some(explicit) => explicit,
        None => {
            let total_pages = first_number(raw, &TOTAL_PAGES_KEYS).unwrap_or(0);
            if total_pages > 0 && size > 0 {
                // An overflowing product is as unusable as a missing field.
                total_pages.checked_mul(size).unwrap_or(fallback_count)
            } else {
                fallback_count
            }
        }
    };
    PageMeta { page, size, total }
}

/// First alias in `keys` whose value coerces to a usable number.
fn first_number(raw: &Value, keys: &[&str]) -> Option<u64> {
    keys.iter().find_map(|key| coerce(raw.get(*key)?))
}

/// Accept JSON numbers and numeric strings that are finite and non-negative,
/// truncated to an integer; everything else counts as absent.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn coerce(value: &Value) -> Option<u64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (n.is_finite() && n >= 0.0).then_some(n as u64)
}
