//! Live state of one data table: filters, sort, selection, live mode.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::column_filters::{ColumnFilterValue, ColumnFiltersState, TableRow};
use crate::filter_field::{FilterFieldSet, FilterKind};
use crate::query_string::ParsedQuery;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub id: String,
    pub desc: bool,
}

impl SortState {
    pub fn new(id: impl Into<String>, desc: bool) -> Self {
        Self { id: id.into(), desc }
    }

    /// `id.asc` / `id.desc`, as used in the URL.
    pub fn encode(&self) -> String {
        format!("{}.{}", self.id, if self.desc { "desc" } else { "asc" })
    }

    pub fn decode(raw: &str) -> Option<Self> {
        let (id, direction) = raw.rsplit_once('.')?;
        if id.is_empty() {
            return None;
        }
        match direction {
            "asc" => Some(Self::new(id, false)),
            "desc" => Some(Self::new(id, true)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DataTableState {
    pub column_filters: ColumnFiltersState,
    pub sorting: Option<SortState>,
    pub row_selection: BTreeSet<String>,
    /// Columns explicitly hidden or shown, visible by default.
    pub column_visibility: BTreeMap<String, bool>,
    /// Tailing mode, exclusive with time range filters and sorting.
    pub live: bool,
}

fn is_timerange(fields: &FilterFieldSet, id: &str) -> bool {
    matches!(fields.get(id).map(|f| &f.kind), Some(FilterKind::Timerange { .. }))
}

impl DataTableState {
    /// Sets or clears one column filter. Setting a time range ends live mode.
    pub fn set_filter(&mut self, fields: &FilterFieldSet, id: &str, value: Option<ColumnFilterValue>) {
        match value {
            Some(value) => {
                if is_timerange(fields, id) {
                    self.live = false;
                }
                self.column_filters.set(id, value);
            }
            None => {
                self.column_filters.remove(id);
            }
        }
    }

    /// Applies a command palette query; a time range in it ends live mode.
    pub fn apply_query(&mut self, parsed: &ParsedQuery, fields: &FilterFieldSet) {
        parsed.apply(&mut self.column_filters, fields);
        if self.column_filters.iter().any(|f| is_timerange(fields, &f.id)) {
            self.live = false;
        }
    }

    /// Setting a sort ends live mode.
    pub fn set_sorting(&mut self, sorting: Option<SortState>) {
        if sorting.is_some() {
            self.live = false;
        }
        self.sorting = sorting;
    }

    /// Cycles a column through ascending, descending and unsorted.
    pub fn toggle_sorting(&mut self, id: &str) {
        let next = match &self.sorting {
            Some(sort) if sort.id == id && !sort.desc => Some(SortState::new(id, true)),
            Some(sort) if sort.id == id => None,
            _ => Some(SortState::new(id, false)),
        };
        self.set_sorting(next);
    }

    /// Enabling live mode drops time range filters and sorting.
    pub fn set_live(&mut self, fields: &FilterFieldSet, live: bool) {
        if live {
            let timeranges = self
                .column_filters
                .iter()
                .filter(|f| is_timerange(fields, &f.id))
                .map(|f| f.id.clone())
                .collect::<Vec<_>>();
            for id in timeranges {
                self.column_filters.remove(&id);
            }
            self.sorting = None;
        }
        self.live = live;
    }

    pub fn toggle_live(&mut self, fields: &FilterFieldSet) {
        let live = !self.live;
        self.set_live(fields, live);
    }

    pub fn reset_filters(&mut self) {
        self.column_filters.clear();
    }

    pub fn select_only(&mut self, row_id: Option<&str>) {
        self.row_selection.clear();
        if let Some(row_id) = row_id {
            self.row_selection.insert(row_id.to_string());
        }
    }

    pub fn toggle_row_selection(&mut self, row_id: &str) {
        if !self.row_selection.remove(row_id) {
            self.row_selection.insert(row_id.to_string());
        }
    }

    /// The row shown in the detail sheet, when exactly one is selected.
    pub fn selected_row(&self) -> Option<&str> {
        match self.row_selection.len() {
            1 => self.row_selection.iter().next().map(String::as_str),
            _ => None,
        }
    }

    /// Rows before and after the selected one among the rows passing the
    /// current filters.
    pub fn row_neighbours<R: TableRow>(&self, rows: &[R]) -> (Option<String>, Option<String>) {
        let Some(selected) = self.selected_row() else { return (None, None) };
        let visible = rows.iter().filter(|row| self.column_filters.matches_row(*row)).map(R::row_id).collect::<Vec<_>>();
        let Some(index) = visible.iter().position(|id| id == selected) else { return (None, None) };
        let prev = index.checked_sub(1).and_then(|i| visible.get(i)).cloned();
        let next = visible.get(index + 1).cloned();
        (prev, next)
    }

    pub fn is_column_visible(&self, id: &str) -> bool {
        self.column_visibility.get(id).copied().unwrap_or(true)
    }

    pub fn toggle_column_visibility(&mut self, id: &str) {
        let visible = self.is_column_visible(id);
        self.column_visibility.insert(id.to_string(), !visible);
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::column_filters::TimeRange;
    use crate::filter_field::{FilterField, FilterOption};

    fn fields() -> FilterFieldSet {
        FilterFieldSet::new(vec![
            FilterField::checkbox("level", "Level", vec![FilterOption::plain("error")]),
            FilterField::timerange("date", "Date", vec![]),
        ])
        .unwrap()
    }

    fn date_filter() -> ColumnFilterValue {
        let start = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        ColumnFilterValue::Timerange(TimeRange::new(start, None))
    }

    #[test]
    fn setting_date_clears_live() {
        let mut state = DataTableState::default();
        state.set_live(&fields(), true);
        assert!(state.live);

        state.set_filter(&fields(), "date", Some(date_filter()));
        assert!(!state.live);
        assert_eq!(state.column_filters.get("date"), Some(&date_filter()));
    }

    #[test]
    fn setting_sort_clears_live() {
        let mut state = DataTableState::default();
        state.toggle_live(&fields());
        state.set_sorting(Some(SortState::new("latency", true)));
        assert!(!state.live);
    }

    #[test]
    fn enabling_live_drops_date_and_sort_but_keeps_other_filters() {
        let mut state = DataTableState::default();
        state.set_filter(&fields(), "date", Some(date_filter()));
        state.set_filter(&fields(), "level", Some(ColumnFilterValue::Options(vec!["error".to_string()])));
        state.set_sorting(Some(SortState::new("date", true)));

        state.set_live(&fields(), true);
        assert!(state.live);
        assert!(state.sorting.is_none());
        assert!(state.column_filters.get("date").is_none());
        assert!(state.column_filters.get("level").is_some());
    }

    #[test]
    fn non_date_filters_do_not_touch_live() {
        let mut state = DataTableState::default();
        state.set_live(&fields(), true);
        state.set_filter(&fields(), "level", Some(ColumnFilterValue::Options(vec!["error".to_string()])));
        assert!(state.live);
    }

    #[test]
    fn command_query_with_date_ends_live() {
        let mut state = DataTableState::default();
        state.set_live(&fields(), true);
        state.apply_query(&crate::query_string::parse("level:error", &fields()), &fields());
        assert!(state.live);
        state.apply_query(&crate::query_string::parse("level:error date:1700000000000", &fields()), &fields());
        assert!(!state.live);
        assert_eq!(state.column_filters.get("date"), Some(&date_filter()));
    }

    #[test]
    fn reset_survives_applying_the_cleared_palette() {
        let mut state = DataTableState::default();
        state.apply_query(&crate::query_string::parse("level:error", &fields()), &fields());
        state.reset_filters();
        state.apply_query(&crate::query_string::parse("", &fields()), &fields());
        assert!(state.column_filters.is_empty());
    }

    #[test]
    fn sort_cycles_through_asc_desc_none() {
        let mut state = DataTableState::default();
        state.toggle_sorting("latency");
        assert_eq!(state.sorting, Some(SortState::new("latency", false)));
        state.toggle_sorting("latency");
        assert_eq!(state.sorting, Some(SortState::new("latency", true)));
        state.toggle_sorting("latency");
        assert_eq!(state.sorting, None);
    }

    #[test]
    fn sort_encoding_uses_last_dot() {
        assert_eq!(SortState::decode("timing.dns.desc"), Some(SortState::new("timing.dns", true)));
        assert_eq!(SortState::new("date", false).encode(), "date.asc");
        assert_eq!(SortState::decode("date"), None);
        assert_eq!(SortState::decode(".asc"), None);
    }

    struct Row(&'static str, &'static str);

    impl TableRow for Row {
        fn row_id(&self) -> String {
            self.0.to_string()
        }

        fn cell(&self, column: &str) -> Option<crate::column_filters::CellValue> {
            (column == "level").then(|| crate::column_filters::CellValue::Text(self.1.to_string()))
        }
    }

    #[test]
    fn neighbours_skip_filtered_out_rows() {
        let rows = [Row("a", "error"), Row("b", "info"), Row("c", "error"), Row("d", "info")];
        let mut state = DataTableState::default();
        state.select_only(Some("c"));
        assert_eq!(state.row_neighbours(&rows), (Some("b".to_string()), Some("d".to_string())));

        state.set_filter(&fields(), "level", Some(ColumnFilterValue::Options(vec!["error".to_string()])));
        assert_eq!(state.row_neighbours(&rows), (Some("a".to_string()), None));

        state.select_only(Some("b"));
        assert_eq!(state.row_neighbours(&rows), (None, None));
    }

    #[test]
    fn selected_row_requires_single_selection() {
        let mut state = DataTableState::default();
        state.toggle_row_selection("a");
        assert_eq!(state.selected_row(), Some("a"));
        state.toggle_row_selection("b");
        assert_eq!(state.selected_row(), None);
        state.select_only(Some("b"));
        assert_eq!(state.selected_row(), Some("b"));
    }
}
