//! Structured per-column filter values of a table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumberRange {
    pub min: f64,
    pub max: f64,
}

impl NumberRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// A single instant matches its whole UTC day.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        match self.end {
            Some(end) => self.start <= at && at <= end,
            None => self.start.date_naive() == at.date_naive(),
        }
    }
}

/// A cell of a table row, as seen by the filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
    List(Vec<String>),
}

impl CellValue {
    /// The facet key of this cell, list cells yield one key per member.
    pub fn facet_keys(&self) -> Vec<String> {
        match self {
            Self::Text(s) => vec![s.clone()],
            Self::Number(n) => vec![n.to_string()],
            Self::Bool(b) => vec![b.to_string()],
            Self::Timestamp(t) => vec![t.timestamp_millis().to_string()],
            Self::List(items) => items.clone(),
        }
    }
}

/// Rows that can be filtered and faceted by column id.
pub trait TableRow {
    fn row_id(&self) -> String;
    fn cell(&self, column: &str) -> Option<CellValue>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ColumnFilterValue {
    /// Checkbox: matches when any listed value matches.
    Options(Vec<String>),
    Range(NumberRange),
    Timerange(TimeRange),
    Text(String),
}

impl ColumnFilterValue {
    pub fn matches(&self, cell: &CellValue) -> bool {
        match (self, cell) {
            (Self::Options(options), cell) => {
                let keys = cell.facet_keys();
                options.iter().any(|o| keys.iter().any(|k| k == o))
            }
            (Self::Range(range), CellValue::Number(n)) => range.contains(*n),
            (Self::Range(_), _) => false,
            (Self::Timerange(range), CellValue::Timestamp(at)) => range.contains(*at),
            (Self::Timerange(_), _) => false,
            (Self::Text(needle), cell) => {
                let needle = needle.to_lowercase();
                cell.facet_keys().iter().any(|k| k.to_lowercase().contains(&needle))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFilter {
    pub id: String,
    pub value: ColumnFilterValue,
}

/// Active filters of a table, at most one per column, in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ColumnFiltersState {
    filters: Vec<ColumnFilter>,
}

impl ColumnFiltersState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&ColumnFilterValue> {
        self.filters.iter().find(|f| f.id == id).map(|f| &f.value)
    }

    /// Replaces the value of `id` in place, or appends it.
    pub fn set(&mut self, id: impl Into<String>, value: ColumnFilterValue) {
        let id = id.into();
        match self.filters.iter_mut().find(|f| f.id == id) {
            Some(existing) => existing.value = value,
            None => self.filters.push(ColumnFilter { id, value }),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<ColumnFilterValue> {
        let index = self.filters.iter().position(|f| f.id == id)?;
        Some(self.filters.remove(index).value)
    }

    pub fn clear(&mut self) {
        self.filters.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnFilter> {
        self.filters.iter()
    }

    pub fn is_option_selected(&self, id: &str, option: &str) -> bool {
        matches!(self.get(id), Some(ColumnFilterValue::Options(values)) if values.iter().any(|v| v == option))
    }

    /// Adds or removes `option` from the array filter of `id`.
    pub fn toggle_option(&mut self, id: &str, option: &str) {
        let mut values = match self.get(id) {
            Some(ColumnFilterValue::Options(values)) => values.clone(),
            _ => Vec::new(),
        };
        match values.iter().position(|v| v == option) {
            Some(index) => {
                values.remove(index);
            }
            None => values.push(option.to_string()),
        }
        if values.is_empty() {
            self.remove(id);
        } else {
            self.set(id, ColumnFilterValue::Options(values));
        }
    }

    pub fn only_option(&mut self, id: &str, option: &str) {
        self.set(id, ColumnFilterValue::Options(vec![option.to_string()]));
    }

    pub fn matches_row<R: TableRow>(&self, row: &R) -> bool {
        self.filters.iter().all(|f| match row.cell(&f.id) {
            Some(cell) => f.value.matches(&cell),
            None => false,
        })
    }
}

impl FromIterator<ColumnFilter> for ColumnFiltersState {
    fn from_iter<T: IntoIterator<Item = ColumnFilter>>(iter: T) -> Self {
        let mut state = Self::new();
        for filter in iter {
            state.set(filter.id, filter.value);
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(values: &[&str]) -> ColumnFilterValue {
        ColumnFilterValue::Options(values.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn set_replaces_in_place_and_keeps_order() {
        let mut state = ColumnFiltersState::new();
        state.set("level", options(&["error"]));
        state.set("path", ColumnFilterValue::Text("api".to_string()));
        state.set("level", options(&["warn"]));

        let ids: Vec<_> = state.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["level", "path"]);
        assert_eq!(state.get("level"), Some(&options(&["warn"])));
    }

    #[test]
    fn toggling_last_option_removes_filter() {
        let mut state = ColumnFiltersState::new();
        state.toggle_option("level", "error");
        state.toggle_option("level", "warn");
        assert_eq!(state.get("level"), Some(&options(&["error", "warn"])));

        state.toggle_option("level", "error");
        state.toggle_option("level", "warn");
        assert!(state.get("level").is_none());
        assert!(state.is_empty());
    }

    #[test]
    fn only_option_replaces_with_singleton() {
        let mut state = ColumnFiltersState::new();
        state.set("regions", options(&["ams", "gru"]));
        state.only_option("regions", "fra");
        assert_eq!(state.get("regions"), Some(&options(&["fra"])));
    }

    #[test]
    fn options_match_any_list_member() {
        let filter = options(&["ams", "fra"]);
        assert!(filter.matches(&CellValue::List(vec!["gru".to_string(), "fra".to_string()])));
        assert!(!filter.matches(&CellValue::Text("gru".to_string())));
        assert!(options(&["200"]).matches(&CellValue::Number(200.0)));
    }

    #[test]
    fn single_instant_timerange_matches_same_day() {
        let start = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        let later_that_day = start + chrono::Duration::hours(1);
        let next_day = start + chrono::Duration::days(1);
        let range = ColumnFilterValue::Timerange(TimeRange::new(start, None));
        assert!(range.matches(&CellValue::Timestamp(later_that_day)));
        assert!(!range.matches(&CellValue::Timestamp(next_day)));
    }

    #[test]
    fn text_filter_is_case_insensitive_substring() {
        let filter = ColumnFilterValue::Text("API".to_string());
        assert!(filter.matches(&CellValue::Text("/v1/api/health".to_string())));
        assert!(!filter.matches(&CellValue::Number(3.0)));
    }

    #[test]
    fn range_filter_is_inclusive() {
        let filter = ColumnFilterValue::Range(NumberRange::new(10.0, 200.0));
        assert!(filter.matches(&CellValue::Number(10.0)));
        assert!(filter.matches(&CellValue::Number(200.0)));
        assert!(!filter.matches(&CellValue::Number(200.5)));
        assert!(!filter.matches(&CellValue::Text("100".to_string())));
    }
}
