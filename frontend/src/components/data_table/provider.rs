//! Table context shared by the sidebar controls, command palette and table.

use dioxus::prelude::*;
use explorer_common::column_filters::ColumnFilterValue;
use explorer_common::entitlement::RetentionPolicy;
use explorer_common::facets::FacetMap;
use explorer_common::filter_field::FilterFieldSet;
use explorer_common::logs::LogsPage;
use explorer_common::search_params::RawSearchParams;
use explorer_common::storage::{CONTROLS_OPEN_KEY, load_json, save_json};
use explorer_common::table_state::DataTableState;

use crate::data_definitions::browser::BrowserStorage;

#[derive(Clone, Copy)]
pub struct DataTableContext {
    pub fields: ReadSignal<FilterFieldSet>,
    pub state: Signal<DataTableState>,
    /// Last loaded page; kept while the next one loads.
    pub page: ReadSignal<LogsPage>,
    pub facets: ReadSignal<FacetMap>,
    pub is_loading: ReadSignal<bool>,
    pub retention: ReadSignal<RetentionPolicy>,
    /// URL state the page was loaded with.
    pub search: ReadSignal<RawSearchParams>,
    pub command_open: Signal<bool>,
    pub load_more: Callback<()>,
}

impl DataTableContext {
    pub fn filter_value(&self, id: &str) -> Option<ColumnFilterValue> {
        self.state.read().column_filters.get(id).cloned()
    }

    pub fn set_filter(&self, id: &str, value: Option<ColumnFilterValue>) {
        let mut state = self.state;
        let fields = self.fields.read();
        state.write().set_filter(&fields, id, value);
    }

    pub fn toggle_option(&self, id: &str, option: &str) {
        let mut state = self.state;
        state.write().column_filters.toggle_option(id, option);
    }

    pub fn only_option(&self, id: &str, option: &str) {
        let mut state = self.state;
        state.write().column_filters.only_option(id, option);
    }

    pub fn reset_filters(&self) {
        let mut state = self.state;
        state.write().reset_filters();
    }

    pub fn toggle_live(&self) {
        let mut state = self.state;
        let fields = self.fields.read();
        state.write().toggle_live(&fields);
    }

    pub fn toggle_sorting(&self, id: &str) {
        let mut state = self.state;
        state.write().toggle_sorting(id);
    }

    pub fn select_row(&self, row_id: Option<&str>) {
        let mut state = self.state;
        state.write().select_only(row_id);
    }
}

/// Sidebar visibility, remembered across visits.
#[derive(Clone, Copy)]
pub struct ControlsContext {
    pub open: Signal<bool>,
}

impl ControlsContext {
    pub fn toggle(&self) {
        let mut open = self.open;
        let next = !open();
        open.set(next);
        save_json(&BrowserStorage, CONTROLS_OPEN_KEY, &next);
    }
}

pub fn use_controls_context_provider() -> ControlsContext {
    let mut open = use_signal(|| true);
    // storage is only readable after hydration
    use_effect(move || {
        if let Some(saved) = load_json::<bool>(&BrowserStorage, CONTROLS_OPEN_KEY) {
            open.set(saved);
        }
    });
    use_context_provider(|| ControlsContext { open })
}
