//! Sidebar with one collapsible section per filter field.

use dioxus::prelude::*;
use dioxus_free_icons::{Icon, icons::md_navigation_icons::{MdExpandLess, MdExpandMore}};
use explorer_common::filter_field::{FilterField, FilterKind, OptionsSource};

use crate::components::data_table::filter_checkbox::DataTableFilterCheckbox;
use crate::components::data_table::filter_checkbox_remote::DataTableFilterCheckboxRemote;
use crate::components::data_table::filter_input::DataTableFilterInput;
use crate::components::data_table::filter_slider::DataTableFilterSlider;
use crate::components::data_table::filter_timerange::DataTableFilterTimerange;
use crate::components::data_table::provider::DataTableContext;

#[component]
pub fn DataTableFilterControls() -> Element {
    let ctx = use_context::<DataTableContext>();
    let fields = use_memo(move || ctx.fields.read().iter().cloned().collect::<Vec<_>>());
    let has_filters = use_memo(move || !ctx.state.read().column_filters.is_empty());

    rsx! {
        div {
            id: "x-data-table-filter-controls",
            style: "
                display: flex;
                flex-direction: column;
                gap: 2px;
                padding: 10px;
                height: 100%;
                overflow-y: auto;
            ",
            div {
                style: "display: flex; flex-direction: row; align-items: center; height: 36px;",
                h2 { style: "font-size: 16px; font-weight: 500; margin: 0;", "Filters" }
                div { style: "flex-grow: 1;" }
                if has_filters() {
                    button {
                        style: "border: none; background: none; cursor: pointer; font-size: 13px; color: rgba(28, 33, 45, 0.7);",
                        onclick: move |_| ctx.reset_filters(),
                        "Reset"
                    }
                }
            }
            for field in fields() {
                FilterSection { key: "{field.value}", field: field.clone() }
            }
        }
    }
}

#[component]
fn FilterSection(field: ReadSignal<FilterField>) -> Element {
    let ctx = use_context::<DataTableContext>();
    let mut open = use_signal(|| field.peek().default_open);
    let is_filtered = use_memo(move || ctx.state.read().column_filters.get(&field.read().value).is_some());

    rsx! {
        div {
            style: "border-bottom: 1px solid rgba(101, 101, 101, 0.2); padding: 4px 0;",
            div {
                style: "display: flex; flex-direction: row; align-items: center; gap: 6px; cursor: pointer; height: 30px;",
                onclick: move |_| {
                    let next = !open();
                    open.set(next);
                },
                span { style: "font-size: 14px; font-weight: 500;", "{field.read().label}" }
                if is_filtered() {
                    span { style: "width: 6px; height: 6px; border-radius: 3px; background-color: rgba(0, 0, 255, 0.9);" }
                }
                div { style: "flex-grow: 1;" }
                if is_filtered() {
                    button {
                        style: "border: none; background: none; cursor: pointer; font-size: 12px; color: rgba(28, 33, 45, 0.7);",
                        onclick: move |e: Event<MouseData>| {
                            e.stop_propagation();
                            ctx.set_filter(&field.read().value, None);
                        },
                        "Clear"
                    }
                }
                if open() {
                    Icon { icon: MdExpandLess, style: "width: 18px; height: 18px;" }
                } else {
                    Icon { icon: MdExpandMore, style: "width: 18px; height: 18px;" }
                }
            }
            if open() {
                div {
                    style: "padding: 4px 0 8px 0;",
                    match field.read().kind {
                        FilterKind::Checkbox { source: OptionsSource::Remote, .. } => rsx! { DataTableFilterCheckboxRemote { field } },
                        FilterKind::Checkbox { .. } => rsx! { DataTableFilterCheckbox { field } },
                        FilterKind::Slider { .. } => rsx! { DataTableFilterSlider { field } },
                        FilterKind::Input { .. } => rsx! { DataTableFilterInput { field } },
                        FilterKind::Timerange { .. } => rsx! { DataTableFilterTimerange { field } },
                    }
                }
            }
        }
    }
}
