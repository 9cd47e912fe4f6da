//! Checkbox filter whose options are looked up on the server as the user types.

use dioxus::prelude::*;
use explorer_common::column_filters::ColumnFilterValue;
use explorer_common::facets::FacetCounts;
use explorer_common::filter_field::{FilterField, FilterOption};
use explorer_common::search_const::REMOTE_OPTIONS_DEBOUNCE_MS;

use crate::api::logs_api::facet_counts;
use crate::components::data_table::filter_checkbox::{FilterCheckboxRow, matches_term};
use crate::components::data_table::provider::DataTableContext;
use crate::components::data_table::use_debounce::use_debounced_commit;
use crate::components::error_boundary::ComponentErrorDisplay;

#[component]
pub fn DataTableFilterCheckboxRemote(field: ReadSignal<FilterField>) -> Element {
    let ctx = use_context::<DataTableContext>();
    let mut term = use_signal(String::new);
    let mut committed_term = use_signal(String::new);
    let debounced = use_debounced_commit(REMOTE_OPTIONS_DEBOUNCE_MS, move |t: String| committed_term.set(t));

    let remote = use_resource(move || {
        let term = committed_term.read().trim().to_string();
        let search = ctx.search.read().clone();
        let column = field.read().value.clone();
        async move {
            if term.is_empty() {
                return None;
            }
            Some(facet_counts(search, column, term).await)
        }
    });
    // previous result stays on screen while the next one loads
    let mut last_counts = use_signal(|| None::<FacetCounts>);
    use_effect(move || match &*remote.read() {
        Some(Some(Ok(counts))) => last_counts.set(Some(counts.clone())),
        Some(None) => last_counts.set(None),
        _ => {}
    });
    let remote_error = use_memo(move || match &*remote.read() {
        Some(Some(Err(e))) => Some(e.to_string()),
        _ => None,
    });
    let is_searching = use_memo(move || debounced.is_pending() || matches!(*remote.state().read(), UseResourceState::Pending));

    let options = use_memo(move || {
        let column = field.read().value.clone();
        let mut facets = ctx.facets.read().clone();
        if let Some(counts) = last_counts.read().as_ref() {
            facets.merge_column(counts);
        }
        let mut values = facets
            .counts(&column)
            .map(|counts| counts.iter().map(|(v, c)| (v.clone(), Some(*c))).collect::<Vec<_>>())
            .unwrap_or_default();
        values.sort_by(|a, b| b.1.cmp(&a.1));
        // selected values stay listed even when the search no longer returns them
        if let Some(ColumnFilterValue::Options(selected)) = ctx.filter_value(&column) {
            for value in selected {
                if !values.iter().any(|(v, _)| *v == value) {
                    values.push((value, None));
                }
            }
        }
        let term = term.read();
        values
            .into_iter()
            .map(|(value, count)| (FilterOption::plain(value), count))
            .filter(|(option, _)| last_counts.read().is_some() || matches_term(option, &term))
            .collect::<Vec<_>>()
    });

    rsx! {
        input {
            r#type: "text",
            placeholder: "Search",
            style: "width: 100%; border: 1px solid rgba(101, 101, 101, 0.5); border-radius: 6px; padding: 4px 8px; margin-bottom: 4px; font-size: 13px;",
            value: "{term}",
            oninput: move |e: Event<FormData>| {
                let value = e.value();
                term.set(value.clone());
                debounced.schedule(value);
            },
        }
        if is_searching() {
            div { style: "font-size: 12px; color: rgba(28, 33, 45, 0.6); padding: 2px 4px;", "Searching..." }
        }
        if let Some(error_txt) = remote_error() {
            ComponentErrorDisplay { error_txt }
        }
        ul {
            for (option, count) in options() {
                li {
                    key: "{option.value}",
                    FilterCheckboxRow { column: field.read().value.clone(), option: option.clone(), count }
                }
            }
        }
    }
}
