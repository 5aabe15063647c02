//! Canonical page shape and upstream list normalization.
//!
//! DESIGN
//! ======
//! The backend answers list endpoints in one of three shapes: a canonical
//! page (`content` array), an `items` envelope with loosely named counters,
//! or a bare array. The UI consumes only the canonical shape, so list routes
//! run every upstream body through [`normalize_list_response`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Canonical paginated result.
///
/// `first`, `last` and `empty` are derived by [`Page::new`] and never set
/// independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u64,
    pub size: u64,
    pub number: u64,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

impl<T> Page<T> {
    /// Build a page, deriving `totalPages` from `total_elements / size`.
    ///
    /// `totalPages` is at least 1, including for an empty result.
    #[must_use]
    pub fn new(content: Vec<T>, total_elements: u64, size: u64, number: u64) -> Self {
        let total_pages = if size > 0 { total_elements.div_ceil(size).max(1) } else { 1 };
        Self::with_total_pages(content, total_elements, total_pages, size, number)
    }

    fn with_total_pages(content: Vec<T>, total_elements: u64, total_pages: u64, size: u64, number: u64) -> Self {
        let empty = content.is_empty();
        Self {
            content,
            total_elements,
            total_pages,
            size,
            number,
            first: number == 0,
            last: number.saturating_add(1) >= total_pages,
            empty,
        }
    }

    /// Treat a complete list as one page.
    #[must_use]
    pub fn single(content: Vec<T>) -> Self {
        let len = content.len() as u64;
        Self::with_total_pages(content, len, 1, len, 0)
    }
}

/// Convert an upstream list body into the canonical page shape.
///
/// Dispatch, first match wins:
/// 1. object with a `content` array: returned unchanged
/// 2. object with an `items` array: counters resolved from their aliases
/// 3. bare array: one complete page
/// 4. anything else: returned unchanged
#[must_use]
pub fn normalize_list_response(value: Value) -> Value {
    if has_array(&value, "content") {
        return value;
    }

    match value {
        Value::Object(mut map) if map.get("items").is_some_and(Value::is_array) => {
            let items = match map.remove("items") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            };
            let len = items.len() as u64;
            let total = first_count(&map, &["total", "totalElements", "count"]).unwrap_or(len);
            let number = first_count(&map, &["page", "number"]).unwrap_or(0);
            let size = first_count(&map, &["size", "pageSize", "limit"]).unwrap_or(len);
            to_value(Page::new(items, total, size, number))
        }
        Value::Array(items) => to_value(Page::single(items)),
        other => other,
    }
}

fn has_array(value: &Value, key: &str) -> bool {
    value.get(key).is_some_and(Value::is_array)
}

fn to_value(page: Page<Value>) -> Value {
    serde_json::to_value(page).unwrap_or(Value::Null)
}

/// First key holding a usable non-negative count.
fn first_count(map: &serde_json::Map<String, Value>, keys: &[&str]) -> Option<u64> {
    keys.iter().find_map(|key| map.get(*key).and_then(as_count))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
#[path = "pagination_test.rs"]
mod tests;
