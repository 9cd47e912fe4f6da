pub mod provider;
pub mod use_debounce;
pub mod filter_checkbox;
pub mod filter_checkbox_remote;
pub mod filter_slider;
pub mod filter_input;
pub mod filter_timerange;
pub mod filter_controls;
pub mod command_palette;
pub mod toolbar;
pub mod table_view;
pub mod row_sheet;

use dioxus::prelude::*;
use explorer_common::entitlement::RetentionPolicy;
use explorer_common::facets::FacetMap;
use explorer_common::filter_field::FilterFieldSet;
use explorer_common::logs::LogsPage;
use explorer_common::search_params::RawSearchParams;
use explorer_common::table_state::DataTableState;

use crate::components::data_table::{
    command_palette::DataTableFilterCommand,
    filter_controls::DataTableFilterControls,
    provider::{DataTableContext, use_controls_context_provider},
    row_sheet::DataTableSheetDetails,
    table_view::DataTableView,
    toolbar::DataTableToolbar,
};
use crate::components::error_boundary::ComponentErrorBoundary;
use crate::data_definitions::browser::is_typing;

/// Filter sidebar, command palette, toolbar and table over one `DataTableState`.
#[component]
pub fn DataTable(
    fields: ReadSignal<FilterFieldSet>,
    state: Signal<DataTableState>,
    page: ReadSignal<LogsPage>,
    is_loading: ReadSignal<bool>,
    retention: ReadSignal<RetentionPolicy>,
    search: ReadSignal<RawSearchParams>,
    command_open: Signal<bool>,
    on_load_more: EventHandler<()>,
) -> Element {
    // server counts when available, else counts over the loaded rows
    let facets = use_memo(move || {
        let page = page.read();
        if page.facets.is_empty() {
            FacetMap::from_rows(&page.rows, &fields.read())
        } else {
            page.facets.clone()
        }
    });

    let ctx = use_context_provider(move || DataTableContext {
        fields,
        state,
        page,
        facets: facets.into(),
        is_loading,
        retention,
        search,
        command_open,
        load_more: Callback::new(move |_| on_load_more.call(())),
    });
    let controls = use_controls_context_provider();

    let on_keydown = move |e: Event<KeyboardData>| {
        let modified = e.modifiers().contains(Modifiers::META) || e.modifiers().contains(Modifiers::CONTROL);
        match e.key() {
            Key::Character(c) if modified && c.eq_ignore_ascii_case("b") => {
                e.prevent_default();
                controls.toggle();
            }
            Key::Escape if modified => {
                e.prevent_default();
                ctx.reset_filters();
            }
            Key::Character(c) if !modified && c == "j" && !is_typing() => ctx.toggle_live(),
            _ => {}
        }
    };

    rsx! {
        div {
            id: "x-data-table-root",
            tabindex: "0",
            style: "
                height: 100%;
                width: 100%;
                display: flex;
                flex-direction: row;
                outline: none;
            ",
            onkeydown: on_keydown,

            if *controls.open.read() {
                div {
                    id: "x-data-table-controls",
                    style: "
                        height: 100%;
                        width: 280px;
                        flex-shrink: 0;
                        overflow-y: auto;
                        background-color: #ECEEF2;
                        border-right: 1px solid rgb(164, 164, 164);
                    ",
                    ComponentErrorBoundary { DataTableFilterControls {} }
                }
            }
            div {
                id: "x-data-table-main",
                style: "
                    height: 100%;
                    flex-grow: 1;
                    min-width: 400px;
                    display: flex;
                    flex-direction: column;
                    gap: 8px;
                    padding: 10px;
                    box-sizing: border-box;
                ",
                DataTableFilterCommand {}
                DataTableToolbar {}
                div {
                    style: "flex-grow: 1; overflow: auto; min-height: 0;",
                    DataTableView {}
                }
            }
            DataTableSheetDetails {}
        }
    }
}
