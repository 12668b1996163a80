//! Filter editor commands

use crate::error::Result;
use crate::filters::{field_name, Bound, FilterState, Indicator};
use crate::state::AppState;
use serde::Serialize;
use tokio::task::JoinHandle;

/// New filter state plus the re-fetch it triggered
#[derive(Debug)]
pub struct FilterUpdate {
    pub filters: FilterState,
    pub fetch: JoinHandle<()>,
}

/// One editor input field
#[derive(Debug, Clone, Serialize)]
pub struct FilterField {
    pub field: String,
    pub label: String,
    pub indicator: Indicator,
    pub bound: Bound,
    pub value: Option<f64>,
    pub advisory_min: f64,
    pub advisory_max: f64,
}

/// Set one bound from raw input; empty input clears it
pub fn set_filter(state: &AppState, field: &str, raw: &str) -> Result<FilterUpdate> {
    let filters = state.get_filters().set_field(field, raw)?;
    tracing::info!("Filter {} set to '{}'", field, raw.trim());

    Ok(FilterUpdate {
        filters,
        fetch: state.set_filters(filters),
    })
}

pub fn clear_filter(state: &AppState, field: &str) -> Result<FilterUpdate> {
    set_filter(state, field, "")
}

/// Clear every bound at once; triggers a single re-fetch
pub fn reset_filters(state: &AppState) -> FilterUpdate {
    tracing::info!("Resetting filters");
    let filters = FilterState::reset();

    FilterUpdate {
        filters,
        fetch: state.set_filters(filters),
    }
}

/// All eight editor fields in display order
pub fn get_filters(state: &AppState) -> Vec<FilterField> {
    let filters = state.get_filters();

    filters
        .ranges()
        .flat_map(|(indicator, range)| {
            [Bound::From, Bound::To].into_iter().map(move |bound| {
                let (advisory_min, advisory_max) = indicator.advisory_range();
                FilterField {
                    field: field_name(indicator, bound),
                    label: format!(
                        "{} {}",
                        indicator.label(),
                        match bound {
                            Bound::From => "From",
                            Bound::To => "To",
                        }
                    ),
                    indicator,
                    bound,
                    value: range.get(bound),
                    advisory_min,
                    advisory_max,
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::query::query_string;
    use crate::backend::testing::StaticBackend;
    use crate::config::ScreenerConfig;
    use std::sync::Arc;

    fn setup() -> (Arc<StaticBackend>, AppState) {
        let backend = Arc::new(StaticBackend::default());
        let state = AppState::with_backend(ScreenerConfig::default(), backend.clone());
        (backend, state)
    }

    #[tokio::test]
    async fn test_each_edit_triggers_a_fetch_with_translated_filters() {
        let (backend, state) = setup();

        set_filter(&state, "rsi14_from", "30").unwrap().fetch.await.unwrap();
        set_filter(&state, "rsi14_to", "70").unwrap().fetch.await.unwrap();

        assert_eq!(backend.call_count(), 2);
        let last = backend.last_request().unwrap();
        assert_eq!(query_string(&last), "rsi14_from=30&rsi14_to=70");
    }

    #[tokio::test]
    async fn test_invalid_input_changes_nothing() {
        let (backend, state) = setup();
        set_filter(&state, "williamsR_to", "-80").unwrap().fetch.await.unwrap();

        assert!(set_filter(&state, "williamsR_from", "abc").is_err());
        assert!(set_filter(&state, "volume_from", "1").is_err());

        assert_eq!(backend.call_count(), 1);
        assert_eq!(state.get_filters().williams_r.to, Some(-80.0));
        assert_eq!(state.get_filters().williams_r.from, None);
    }

    #[tokio::test]
    async fn test_reset_issues_exactly_one_parameterless_fetch() {
        let (backend, state) = setup();
        set_filter(&state, "rsi21_from", "10").unwrap().fetch.await.unwrap();
        set_filter(&state, "emaWilliamsR_to", "-5").unwrap().fetch.await.unwrap();

        let update = reset_filters(&state);
        update.fetch.await.unwrap();

        assert!(update.filters.is_empty());
        assert_eq!(backend.call_count(), 3);
        assert_eq!(query_string(&backend.last_request().unwrap()), "");
    }

    #[tokio::test]
    async fn test_clear_filter() {
        let (_backend, state) = setup();
        set_filter(&state, "rsi14_from", "30").unwrap().fetch.await.unwrap();
        clear_filter(&state, "rsi14_from").unwrap().fetch.await.unwrap();
        assert!(state.get_filters().is_empty());
    }

    #[test]
    fn test_get_filters_lists_eight_fields() {
        let (_backend, state) = setup();
        let fields = get_filters(&state);

        assert_eq!(fields.len(), 8);
        assert_eq!(fields[0].field, "williamsR_from");
        assert_eq!(fields[0].label, "Williams %R From");
        assert_eq!((fields[0].advisory_min, fields[0].advisory_max), (-100.0, 0.0));
        assert_eq!(fields[7].field, "rsi21_to");
        assert!(fields.iter().all(|f| f.value.is_none()));
    }
}
