//! Row counts and table-wide actions above the table.

use dioxus::prelude::*;
use dioxus_free_icons::{Icon, icons::{md_file_icons::MdFileDownload, md_navigation_icons::MdRefresh}};
use explorer_common::logs::LOG_COLUMNS;
use explorer_common::search_params::encode_search_params;

use crate::components::data_table::provider::{ControlsContext, DataTableContext};
use crate::components::data_table::table_view::column_label;

const EXPORT_PATH: &str = "/_export_logs";

const BUTTON_STYLE: &str = "
    display: flex;
    align-items: center;
    gap: 4px;
    border: 1px solid rgba(101, 101, 101, 0.5);
    border-radius: 6px;
    background: white;
    cursor: pointer;
    font-size: 13px;
    padding: 4px 10px;
    height: 30px;
    color: #111827;
    text-decoration: none;
";

#[component]
pub fn DataTableToolbar() -> Element {
    let ctx = use_context::<DataTableContext>();
    let controls = use_context::<ControlsContext>();
    let mut columns_open = use_signal(|| false);

    let count_txt = use_memo(move || {
        let page = ctx.page.read();
        format!("{} of {} rows", page.filter_row_count, page.total_row_count)
    });
    let has_filters = use_memo(move || !ctx.state.read().column_filters.is_empty());
    let live = use_memo(move || ctx.state.read().live);
    let export_href = use_memo(move || {
        let raw = encode_search_params(&ctx.state.read(), &ctx.fields.read());
        if raw.is_empty() { EXPORT_PATH.to_string() } else { format!("{EXPORT_PATH}?{raw}") }
    });
    let live_style = use_memo(move || {
        if live() {
            format!("{BUTTON_STYLE} border-color: rgb(22, 163, 74); color: rgb(22, 163, 74);")
        } else {
            BUTTON_STYLE.to_string()
        }
    });

    rsx! {
        div {
            id: "x-data-table-toolbar",
            style: "display: flex; flex-direction: row; align-items: center; gap: 8px; padding: 6px 0; height: 44px;",
            button {
                style: BUTTON_STYLE,
                title: "Toggle controls (Ctrl/Cmd+B)",
                onclick: move |_| controls.toggle(),
                if *controls.open.read() { "Hide controls" } else { "Show controls" }
            }
            span { class: "x-mono", style: "font-size: 13px; color: rgba(28, 33, 45, 0.7);", "{count_txt}" }
            if *ctx.is_loading.read() {
                Icon { icon: MdRefresh, style: "width: 16px; height: 16px; color: #6B7280;" }
            }
            div { style: "flex-grow: 1;" }
            if has_filters() {
                button {
                    style: BUTTON_STYLE,
                    title: "Reset filters (Ctrl/Cmd+Esc)",
                    onclick: move |_| ctx.reset_filters(),
                    "Reset"
                }
            }
            button {
                style: "{live_style}",
                title: "Live mode (J)",
                onclick: move |_| ctx.toggle_live(),
                if live() { "Live" } else { "Go live" }
            }
            div {
                style: "position: relative;",
                button {
                    style: BUTTON_STYLE,
                    onclick: move |_| {
                        let next = !columns_open();
                        columns_open.set(next);
                    },
                    "Columns"
                }
                if columns_open() {
                    ColumnVisibilityMenu {}
                }
            }
            a {
                style: BUTTON_STYLE,
                href: "{export_href}",
                download: "logs.ndjson",
                Icon { icon: MdFileDownload, style: "width: 16px; height: 16px;" }
                "Export"
            }
        }
    }
}

#[component]
fn ColumnVisibilityMenu() -> Element {
    let ctx = use_context::<DataTableContext>();
    let mut state = ctx.state;
    rsx! {
        ul {
            style: "
                position: absolute;
                top: 34px;
                right: 0px;
                min-width: 180px;
                background-color: white;
                border: 1px solid rgba(101, 101, 101, 0.5);
                border-radius: 8px;
                box-shadow: 0 0 10px 0 rgba(0, 0, 0, 0.1);
                padding: 4px;
                z-index: 1000;
            ",
            for column in LOG_COLUMNS {
                li {
                    key: "{column}",
                    class: "x-filter-list-item",
                    style: "display: flex; align-items: center; gap: 6px; padding: 4px 6px; cursor: pointer; font-size: 13px; border-radius: 4px;",
                    onclick: move |_| state.write().toggle_column_visibility(column),
                    input {
                        r#type: "checkbox",
                        checked: state.read().is_column_visible(column),
                        readonly: true,
                    }
                    "{column_label(&ctx.fields.read(), column)}"
                }
            }
        }
    }
}
