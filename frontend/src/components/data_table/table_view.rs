//! The log rows, with sortable headers and incremental loading.

use dioxus::prelude::*;
use dioxus_free_icons::{Icon, icons::md_navigation_icons::{MdArrowDownward, MdArrowUpward}};
use explorer_common::filter_field::FilterFieldSet;
use explorer_common::logs::{LOG_COLUMNS, LogRow};
use explorer_common::search_const::MAX_LOADED_ROWS;

use crate::components::data_table::provider::DataTableContext;

/// Header text of a column: the filter label when there is one.
pub(crate) fn column_label(fields: &FilterFieldSet, column: &str) -> String {
    match fields.get(column) {
        Some(field) => field.label.clone(),
        None => {
            let mut chars = column.replace('_', " ").chars().collect::<Vec<_>>();
            if let Some(first) = chars.first_mut() {
                *first = first.to_ascii_uppercase();
            }
            chars.into_iter().collect()
        }
    }
}

pub(crate) fn cell_text(row: &LogRow, column: &str) -> String {
    match column {
        "uuid" => row.uuid.clone(),
        "date" => row.date.format("%b %d, %H:%M:%S").to_string(),
        "level" => row.level.clone(),
        "status" => row.status.to_string(),
        "method" => row.method.clone(),
        "host" => row.host.clone(),
        "pathname" => row.pathname.clone(),
        "latency" => format!("{}ms", row.latency),
        "regions" => row.regions.join(", "),
        "trace_id" => row.trace_id.clone(),
        "message" => row.message.clone().unwrap_or_default(),
        _ => String::new(),
    }
}

pub(crate) fn level_color(level: &str) -> &'static str {
    match level {
        "error" => "rgb(220, 38, 38)",
        "warning" => "rgb(234, 179, 8)",
        _ => "rgb(22, 163, 74)",
    }
}

#[component]
pub fn DataTableView() -> Element {
    let ctx = use_context::<DataTableContext>();
    let columns = use_memo(move || {
        let state = ctx.state.read();
        LOG_COLUMNS.iter().filter(|c| state.is_column_visible(c)).map(|c| c.to_string()).collect::<Vec<_>>()
    });
    // the server result lags behind while the palette is open, narrow it here
    let rows = use_memo(move || {
        let state = ctx.state.read();
        ctx.page.read().rows.iter().filter(|row| state.column_filters.matches_row(*row)).cloned().collect::<Vec<_>>()
    });
    let can_load_more = use_memo(move || {
        let page = ctx.page.read();
        page.has_next_page() && (page.rows.len() as u64) < MAX_LOADED_ROWS
    });
    let live = use_memo(move || ctx.state.read().live);

    rsx! {
        div {
            id: "x-data-table-view",
            style: "width: 100%; height: 100%; overflow: auto; background-color: white; border: 1px solid rgba(101, 101, 101, 0.3); border-radius: 8px;",
            if live() {
                div {
                    style: "font-size: 12px; color: rgb(22, 163, 74); padding: 4px 8px; border-bottom: 1px solid rgba(101, 101, 101, 0.2);",
                    "Live: refreshing every few seconds"
                }
            }
            table {
                style: "width: 100%; border-collapse: collapse; font-size: 13px;",
                thead {
                    tr {
                        for column in columns() {
                            SortableHeader { key: "{column}", column: column.clone() }
                        }
                    }
                }
                tbody {
                    for row in rows() {
                        TableRowView { key: "{row.uuid}", row: row.clone(), columns: columns() }
                    }
                }
            }
            if rows.read().is_empty() {
                if *ctx.is_loading.read() {
                    div { style: "padding: 20px; text-align: center; color: rgba(28, 33, 45, 0.7);", "Loading..." }
                } else {
                    div { style: "padding: 20px; text-align: center; color: rgba(28, 33, 45, 0.6);", "No results" }
                }
            }
            if can_load_more() {
                div {
                    style: "display: flex; justify-content: center; padding: 10px;",
                    button {
                        style: "border: 1px solid rgba(101, 101, 101, 0.5); border-radius: 6px; background: white; cursor: pointer; font-size: 13px; padding: 4px 12px;",
                        disabled: *ctx.is_loading.read(),
                        onclick: move |_| ctx.load_more.call(()),
                        "Load more"
                    }
                }
            }
        }
    }
}

#[component]
fn SortableHeader(column: ReadSignal<String>) -> Element {
    let ctx = use_context::<DataTableContext>();
    let sorted = use_memo(move || match &ctx.state.read().sorting {
        Some(sort) if sort.id == *column.read() => Some(sort.desc),
        _ => None,
    });
    let label = use_memo(move || column_label(&ctx.fields.read(), &column.read()));
    rsx! {
        th {
            style: "text-align: left; padding: 6px 8px; border-bottom: 1px solid rgba(101, 101, 101, 0.3); position: sticky; top: 0; background-color: white; cursor: pointer; white-space: nowrap; font-weight: 500;",
            onclick: move |_| ctx.toggle_sorting(&column.read()),
            "{label}"
            match sorted() {
                Some(true) => rsx! { Icon { icon: MdArrowDownward, style: "width: 12px; height: 12px; margin-left: 4px;" } },
                Some(false) => rsx! { Icon { icon: MdArrowUpward, style: "width: 12px; height: 12px; margin-left: 4px;" } },
                None => rsx! {},
            }
        }
    }
}

#[component]
fn TableRowView(row: ReadSignal<LogRow>, columns: ReadSignal<Vec<String>>) -> Element {
    let ctx = use_context::<DataTableContext>();
    let is_selected = use_memo(move || ctx.state.read().row_selection.contains(&row.read().uuid));
    let class = if is_selected() { "x-table-row x-table-row-selected" } else { "x-table-row" };
    rsx! {
        tr {
            class: "{class}",
            style: "cursor: pointer; border-bottom: 1px solid rgba(101, 101, 101, 0.15);",
            onclick: move |_| {
                let uuid = row.read().uuid.clone();
                if is_selected() {
                    ctx.select_row(None);
                } else {
                    ctx.select_row(Some(&uuid));
                }
            },
            for column in columns() {
                td {
                    key: "{column}",
                    class: "x-mono",
                    style: "padding: 4px 8px; white-space: nowrap; overflow: hidden; text-overflow: ellipsis; max-width: 320px;",
                    if column == "level" {
                        span {
                            style: "display: inline-block; width: 8px; height: 8px; border-radius: 4px; margin-right: 6px; background-color: {level_color(&row.read().level)};",
                        }
                    }
                    "{cell_text(&row.read(), &column)}"
                }
            }
        }
    }
}
