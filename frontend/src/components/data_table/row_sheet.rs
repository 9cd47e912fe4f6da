//! Detail panel of the selected row.

use dioxus::prelude::*;
use dioxus_free_icons::{Icon, icons::md_navigation_icons::{MdChevronLeft, MdChevronRight, MdClose}};
use explorer_common::column_filters::{CellValue, TableRow};
use explorer_common::filter_field::FilterKind;
use explorer_common::logs::LOG_COLUMNS;

use crate::components::data_table::provider::DataTableContext;
use crate::components::data_table::table_view::{cell_text, column_label};

#[component]
pub fn DataTableSheetDetails() -> Element {
    let ctx = use_context::<DataTableContext>();
    let selected = use_memo(move || {
        let state = ctx.state.read();
        let id = state.selected_row()?;
        ctx.page.read().rows.iter().find(|r| r.uuid == id).cloned()
    });
    // steps through the rows the table shows
    let neighbours = use_memo(move || ctx.state.read().row_neighbours(&ctx.page.read().rows));

    let Some(row) = selected() else {
        return rsx! {};
    };
    let (prev, next) = neighbours();
    let nav_style = "border: none; background: none; cursor: pointer; padding: 2px;";

    rsx! {
        div {
            id: "x-data-table-sheet",
            style: "
                width: 420px;
                min-width: 320px;
                height: 100%;
                border-left: 1px solid rgba(101, 101, 101, 0.3);
                background-color: white;
                display: flex;
                flex-direction: column;
            ",
            div {
                style: "display: flex; flex-direction: row; align-items: center; gap: 4px; padding: 8px; border-bottom: 1px solid rgba(101, 101, 101, 0.2);",
                span { class: "x-mono", style: "font-size: 13px; overflow: hidden; text-overflow: ellipsis; white-space: nowrap;", "{row.uuid}" }
                div { style: "flex-grow: 1;" }
                button {
                    style: nav_style,
                    disabled: prev.is_none(),
                    onclick: move |_| ctx.select_row(prev.as_deref()),
                    Icon { icon: MdChevronLeft, style: "width: 20px; height: 20px;" }
                }
                button {
                    style: nav_style,
                    disabled: next.is_none(),
                    onclick: move |_| ctx.select_row(next.as_deref()),
                    Icon { icon: MdChevronRight, style: "width: 20px; height: 20px;" }
                }
                button {
                    style: nav_style,
                    onclick: move |_| ctx.select_row(None),
                    Icon { icon: MdClose, style: "width: 20px; height: 20px;" }
                }
            }
            dl {
                style: "margin: 0; padding: 8px; overflow-y: auto; font-size: 13px;",
                for column in LOG_COLUMNS {
                    SheetField {
                        key: "{column}",
                        column: column.to_string(),
                        value: cell_text(&row, column),
                        filter_value: match row.cell(column) {
                            Some(CellValue::Text(text)) => Some(text),
                            _ => None,
                        },
                    }
                }
            }
        }
    }
}

#[component]
fn SheetField(column: ReadSignal<String>, value: ReadSignal<String>, filter_value: ReadSignal<Option<String>>) -> Element {
    let ctx = use_context::<DataTableContext>();
    // single values of option columns can become a filter
    let option_value = use_memo(move || {
        let is_checkbox =
            matches!(ctx.fields.read().get(&column.read()).map(|f| &f.kind), Some(FilterKind::Checkbox { .. }));
        filter_value.read().clone().filter(|v| is_checkbox && !v.is_empty())
    });
    let label = use_memo(move || column_label(&ctx.fields.read(), &column.read()));
    rsx! {
        div {
            style: "display: flex; flex-direction: row; gap: 8px; padding: 4px 0; border-bottom: 1px solid rgba(101, 101, 101, 0.1);",
            dt { style: "width: 110px; flex-shrink: 0; color: rgba(28, 33, 45, 0.7);", "{label}" }
            dd { class: "x-mono", style: "margin: 0; word-break: break-all; flex-grow: 1;", "{value}" }
            if let Some(option) = option_value() {
                button {
                    style: "border: none; background: none; cursor: pointer; font-size: 11px; color: rgba(28, 33, 45, 0.6);",
                    title: "Filter by this value",
                    onclick: move |_| ctx.only_option(&column.read(), &option),
                    "filter"
                }
            }
        }
    }
}
