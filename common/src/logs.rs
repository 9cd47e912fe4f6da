//! Request logs shown by the explorer table, and their filter fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::column_filters::{CellValue, TableRow};
use crate::facets::FacetMap;
use crate::filter_field::{FilterConfigError, FilterField, FilterFieldSet, FilterOption, TimerangePreset};

pub const LEVELS: [&str; 3] = ["success", "warning", "error"];
pub const METHODS: [&str; 4] = ["GET", "POST", "PUT", "DELETE"];
pub const REGIONS: [&str; 6] = ["ams", "fra", "gru", "hkg", "iad", "syd"];
pub const STATUSES: [&str; 6] = ["200", "201", "400", "404", "500", "503"];

/// Columns in display order, also the SQL column names.
pub const LOG_COLUMNS: [&str; 10] =
    ["level", "date", "status", "method", "host", "pathname", "latency", "regions", "trace_id", "message"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRow {
    pub uuid: String,
    pub date: DateTime<Utc>,
    pub level: String,
    pub status: u16,
    pub method: String,
    pub host: String,
    pub pathname: String,
    /// Milliseconds.
    pub latency: f64,
    pub regions: Vec<String>,
    pub trace_id: String,
    pub message: Option<String>,
}

impl TableRow for LogRow {
    fn row_id(&self) -> String {
        self.uuid.clone()
    }

    fn cell(&self, column: &str) -> Option<CellValue> {
        Some(match column {
            "uuid" => CellValue::Text(self.uuid.clone()),
            "date" => CellValue::Timestamp(self.date),
            "level" => CellValue::Text(self.level.clone()),
            "status" => CellValue::Text(self.status.to_string()),
            "method" => CellValue::Text(self.method.clone()),
            "host" => CellValue::Text(self.host.clone()),
            "pathname" => CellValue::Text(self.pathname.clone()),
            "latency" => CellValue::Number(self.latency),
            "regions" => CellValue::List(self.regions.clone()),
            "trace_id" => CellValue::Text(self.trace_id.clone()),
            "message" => CellValue::Text(self.message.clone()?),
            _ => return None,
        })
    }
}

fn plain_options(values: &[&str]) -> Vec<FilterOption> {
    values.iter().map(|v| FilterOption::plain(*v)).collect()
}

pub fn log_filter_fields() -> Result<FilterFieldSet, FilterConfigError> {
    FilterFieldSet::new(vec![
        FilterField::checkbox("level", "Level", plain_options(&LEVELS)).with_default_open(true),
        FilterField::timerange(
            "date",
            "Date",
            vec![
                TimerangePreset::new("Last hour", "h", 60),
                TimerangePreset::new("Last day", "d", 60 * 24),
                TimerangePreset::new("Last week", "w", 60 * 24 * 7),
            ],
        )
        .with_default_open(true),
        FilterField::checkbox("status", "Status Code", plain_options(&STATUSES)).with_default_open(true),
        FilterField::checkbox("method", "Method", plain_options(&METHODS)),
        FilterField::checkbox("regions", "Regions", plain_options(&REGIONS)),
        FilterField::remote_checkbox("host", "Host"),
        FilterField::input("pathname", "Pathname"),
        FilterField::slider("latency", "Latency", 0.0, 5000.0),
        FilterField::input("trace_id", "Trace ID").with_command_disabled(true),
    ])
}

/// One load of the log table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct LogsPage {
    pub rows: Vec<LogRow>,
    /// Counts over the whole filtered result, not only `rows`.
    pub facets: FacetMap,
    pub total_row_count: u64,
    pub filter_row_count: u64,
}

impl LogsPage {
    pub fn has_next_page(&self) -> bool {
        (self.rows.len() as u64) < self.filter_row_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column_filters::{ColumnFilterValue, ColumnFiltersState, NumberRange};

    fn row() -> LogRow {
        LogRow {
            uuid: "0b8a".to_string(),
            date: DateTime::from_timestamp_millis(1_700_000_000_000).unwrap(),
            level: "error".to_string(),
            status: 500,
            method: "GET".to_string(),
            host: "api.example.com".to_string(),
            pathname: "/v1/monitors".to_string(),
            latency: 812.0,
            regions: vec!["ams".to_string(), "gru".to_string()],
            trace_id: "t-1".to_string(),
            message: None,
        }
    }

    #[test]
    fn field_set_is_valid() {
        let fields = log_filter_fields().unwrap();
        assert!(fields.get("trace_id").unwrap().command_disabled);
        for field in fields.iter() {
            assert!(LOG_COLUMNS.contains(&field.value.as_str()), "{} is not a column", field.value);
        }
    }

    #[test]
    fn row_matches_client_side_filters() {
        let mut filters = ColumnFiltersState::new();
        filters.set("regions", ColumnFilterValue::Options(vec!["gru".to_string()]));
        filters.set("status", ColumnFilterValue::Options(vec!["500".to_string()]));
        filters.set("latency", ColumnFilterValue::Range(NumberRange::new(500.0, 1000.0)));
        assert!(filters.matches_row(&row()));

        filters.set("pathname", ColumnFilterValue::Text("users".to_string()));
        assert!(!filters.matches_row(&row()));
    }

    #[test]
    fn missing_message_never_matches() {
        let mut filters = ColumnFiltersState::new();
        filters.set("message", ColumnFilterValue::Text("x".to_string()));
        assert!(!filters.matches_row(&row()));
    }

    #[test]
    fn next_page_while_rows_are_missing() {
        let page = LogsPage { rows: vec![row()], filter_row_count: 2, ..Default::default() };
        assert!(page.has_next_page());
    }
}
