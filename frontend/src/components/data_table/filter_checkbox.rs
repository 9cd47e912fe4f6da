//! Checkbox filter over the configured options of a column.

use dioxus::prelude::*;
use dioxus_free_icons::{Icon, icons::md_toggle_icons::{MdCheckBox, MdCheckBoxOutlineBlank}};
use explorer_common::filter_field::{FilterField, FilterOption};
use explorer_common::search_const::CHECKBOX_SEARCH_THRESHOLD;

use crate::components::data_table::provider::DataTableContext;

pub(crate) fn matches_term(option: &FilterOption, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    term.is_empty() || option.label.to_lowercase().contains(&term) || option.value.to_lowercase().contains(&term)
}

#[component]
pub fn DataTableFilterCheckbox(field: ReadSignal<FilterField>) -> Element {
    let ctx = use_context::<DataTableContext>();
    let mut search = use_signal(String::new);

    // configured options first, then values only seen in the data
    let options = use_memo(move || {
        let field = field.read();
        let mut options = field.kind.options().to_vec();
        if let Some(counts) = ctx.facets.read().counts(&field.value) {
            for value in counts.keys() {
                if !field.has_option(value) {
                    options.push(FilterOption::plain(value.clone()));
                }
            }
        }
        options
    });
    let visible_options = use_memo(move || {
        let term = search.read();
        options.read().iter().filter(|o| matches_term(o, &term)).cloned().collect::<Vec<_>>()
    });

    rsx! {
        if options.read().len() > CHECKBOX_SEARCH_THRESHOLD {
            input {
                r#type: "text",
                placeholder: "Search",
                style: "width: 100%; border: 1px solid rgba(101, 101, 101, 0.5); border-radius: 6px; padding: 4px 8px; margin-bottom: 4px; font-size: 13px;",
                value: "{search}",
                oninput: move |e: Event<FormData>| search.set(e.value()),
            }
        }
        ul {
            for option in visible_options() {
                li {
                    key: "{option.value}",
                    FilterCheckboxRow {
                        column: field.read().value.clone(),
                        count: ctx.facets.read().count(&field.read().value, &option.value),
                        option: option.clone(),
                    }
                }
            }
        }
        if visible_options.read().is_empty() {
            div { style: "font-size: 13px; color: rgba(28, 33, 45, 0.6); padding: 4px;", "No results" }
        }
    }
}

#[component]
pub(crate) fn FilterCheckboxRow(
    column: ReadSignal<String>,
    option: ReadSignal<FilterOption>,
    count: ReadSignal<Option<u64>>,
) -> Element {
    let ctx = use_context::<DataTableContext>();
    let is_checked = use_memo(move || ctx.state.read().column_filters.is_option_selected(&column.read(), &option.read().value));
    let count_txt = use_memo(move || (*count.read()).map(|c| c.to_string()).unwrap_or_default());

    rsx! {
        div {
            class: "x-filter-list-item",
            style: "
                display: flex;
                flex-direction: row;
                gap: 6px;
                cursor: pointer;
                padding: 2px 4px;
                align-items: center;
                border-radius: 4px;
                font-size: 14px;
            ",
            onclick: move |_| ctx.toggle_option(&column.read(), &option.read().value),

            if is_checked() {
                Icon { icon: MdCheckBox, style: "width: 18px; height: 18px; color: rgb(28, 33, 45); flex-shrink: 0;" }
            } else {
                Icon { icon: MdCheckBoxOutlineBlank, style: "width: 18px; height: 18px; color: rgb(28, 33, 45); flex-shrink: 0;" }
            }
            div {
                style: "overflow: hidden; text-overflow: ellipsis; white-space: nowrap; min-width: 0;",
                "{option.read().label}"
            }
            div { style: "flex: 1 1 auto;" }
            button {
                style: "border: none; background: none; cursor: pointer; font-size: 11px; color: rgba(28, 33, 45, 0.6); padding: 0 2px;",
                title: "Only this value",
                onclick: move |e: Event<MouseData>| {
                    e.stop_propagation();
                    ctx.only_option(&column.read(), &option.read().value);
                },
                "only"
            }
            div {
                class: "x-mono",
                style: "font-size: 12px; color: rgba(28, 33, 45, 0.7); flex-shrink: 0;",
                "{count_txt}"
            }
        }
    }
}
