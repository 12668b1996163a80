//! Filter state to query string translation

use crate::filters::{Bound, FilterState};

/// Query parameters for the current filters, in fixed indicator order.
///
/// A set `from` bound yields `<indicator>_from`, a set `to` bound yields
/// `<indicator>_to`; unset bounds contribute nothing.
pub fn query_params(filters: &FilterState) -> Vec<(String, String)> {
    let mut params = Vec::new();

    for (indicator, range) in filters.ranges() {
        for bound in [Bound::From, Bound::To] {
            if let Some(value) = range.get(bound) {
                params.push((
                    format!("{}_{}", indicator.key(), bound.key()),
                    format_value(value),
                ));
            }
        }
    }

    params
}

/// Percent-encoded query string without the leading `?`
pub fn query_string(filters: &FilterState) -> String {
    query_params(filters)
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Full request URL for `/stock-all-data`
pub fn stock_all_data_url(base_url: &str, filters: &FilterState) -> String {
    let query = query_string(filters);
    if query.is_empty() {
        format!("{}/stock-all-data", base_url)
    } else {
        format!("{}/stock-all-data?{}", base_url, query)
    }
}

// Shortest decimal that round-trips: 30 -> "30", 30.5 -> "30.5"
fn format_value(value: f64) -> String {
    value.to_string()
}
