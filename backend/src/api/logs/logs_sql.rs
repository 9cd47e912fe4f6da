//! SQL fragments for the logs table. Column names only ever come from the
//! registered filter fields; every value is bound as a query parameter.

use chrono::{DateTime, Days, Utc};
use clickhouse::query::Query;
use explorer_common::column_filters::{ColumnFilterValue, ColumnFiltersState, TimeRange};
use explorer_common::filter_field::FilterFieldSet;
use explorer_common::logs::LOG_COLUMNS;
use explorer_common::table_state::SortState;

/// Columns stored as `Array(String)`.
pub const ARRAY_COLUMNS: [&str; 1] = ["regions"];

pub const SQL_SELECT_COLUMNS: &str = "toString(uuid) AS uuid, \
    toString(toUnixTimestamp64Milli(date)) AS date_ms, \
    level, status, method, host, pathname, latency, regions, trace_id, message";

pub const SQL_DEFAULT_ORDER: &str = "ORDER BY date DESC";

#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    TextList(Vec<String>),
    Number(f64),
    Millis(i64),
}

/// A `WHERE` clause and the parameters for its `?` placeholders, in order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SqlWhere {
    pub clause: String,
    pub params: Vec<SqlParam>,
}

impl SqlWhere {
    pub fn bind(&self, mut query: Query) -> Query {
        for param in &self.params {
            query = match param {
                SqlParam::Text(text) => query.bind(text.as_str()),
                SqlParam::TextList(list) => query.bind(list.clone()),
                SqlParam::Number(number) => query.bind(*number),
                SqlParam::Millis(millis) => query.bind(*millis),
            };
        }
        query
    }
}

pub fn is_array_column(column: &str) -> bool {
    ARRAY_COLUMNS.contains(&column)
}

/// Registered and present in the table.
pub fn is_known_column(fields: &FilterFieldSet, column: &str) -> bool {
    fields.get(column).is_some() && LOG_COLUMNS.contains(&column)
}

/// Expression yielding one string per facet value of `column`.
pub fn facet_value_expr(column: &str) -> String {
    if is_array_column(column) {
        format!("arrayJoin({column})")
    } else {
        format!("toString({column})")
    }
}

fn day_bounds(at: DateTime<Utc>) -> Option<(i64, i64)> {
    let start = at.date_naive().and_hms_opt(0, 0, 0)?.and_utc();
    let end = start.checked_add_days(Days::new(1))?;
    Some((start.timestamp_millis(), end.timestamp_millis() - 1))
}

fn timerange_bounds(range: &TimeRange) -> Option<(i64, i64)> {
    match range.end {
        Some(end) => Some((range.start.timestamp_millis(), end.timestamp_millis())),
        None => day_bounds(range.start),
    }
}

fn filter_condition(column: &str, value: &ColumnFilterValue, params: &mut Vec<SqlParam>) -> Option<String> {
    match value {
        ColumnFilterValue::Options(options) if options.is_empty() => None,
        ColumnFilterValue::Options(options) if is_array_column(column) => {
            params.push(SqlParam::TextList(options.clone()));
            Some(format!("hasAny({column}, ?)"))
        }
        ColumnFilterValue::Options(options) => {
            params.push(SqlParam::TextList(options.clone()));
            Some(format!("has(?, toString({column}))"))
        }
        ColumnFilterValue::Range(range) => {
            params.push(SqlParam::Number(range.min));
            params.push(SqlParam::Number(range.max));
            Some(format!("{column} BETWEEN ? AND ?"))
        }
        ColumnFilterValue::Timerange(range) => {
            let (start, end) = timerange_bounds(range)?;
            params.push(SqlParam::Millis(start));
            params.push(SqlParam::Millis(end));
            Some(format!("toUnixTimestamp64Milli({column}) BETWEEN ? AND ?"))
        }
        ColumnFilterValue::Text(text) if text.is_empty() => None,
        ColumnFilterValue::Text(text) => {
            params.push(SqlParam::Text(text.clone()));
            Some(format!("positionCaseInsensitive(toString({column}), ?) > 0"))
        }
    }
}

/// Builds the `WHERE` clause for the filters. `skip_column` leaves out the
/// filter of a facet's own column so unselected values keep their counts.
pub fn build_sql_where_clause(
    filters: &ColumnFiltersState,
    fields: &FilterFieldSet,
    skip_column: Option<&str>,
) -> SqlWhere {
    let mut params = Vec::new();
    let conditions = filters
        .iter()
        .filter(|filter| Some(filter.id.as_str()) != skip_column)
        .filter(|filter| is_known_column(fields, &filter.id))
        .filter_map(|filter| filter_condition(&filter.id, &filter.value, &mut params))
        .collect::<Vec<_>>();
    if conditions.is_empty() {
        return SqlWhere::default();
    }
    SqlWhere { clause: format!("WHERE {}", conditions.join(" AND ")), params }
}

pub fn build_sql_order_clause(sorting: Option<&SortState>) -> String {
    match sorting {
        Some(sort) if LOG_COLUMNS.contains(&sort.id.as_str()) => {
            let direction = if sort.desc { "DESC" } else { "ASC" };
            if sort.id == "date" {
                format!("ORDER BY date {direction}")
            } else {
                format!("ORDER BY {} {direction}, date DESC", sort.id)
            }
        }
        _ => SQL_DEFAULT_ORDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use explorer_common::column_filters::NumberRange;
    use explorer_common::logs::log_filter_fields;
    use pretty_assertions::assert_eq;

    use super::*;

    fn options(values: &[&str]) -> ColumnFilterValue {
        ColumnFilterValue::Options(values.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn no_filters_no_where() {
        let fields = log_filter_fields().unwrap();
        assert_eq!(build_sql_where_clause(&ColumnFiltersState::new(), &fields, None), SqlWhere::default());
    }

    #[test]
    fn builds_conditions_in_filter_order() {
        let fields = log_filter_fields().unwrap();
        let mut filters = ColumnFiltersState::new();
        filters.set("status", options(&["500", "503"]));
        filters.set("regions", options(&["ams"]));
        filters.set("latency", ColumnFilterValue::Range(NumberRange::new(10.0, 200.0)));
        filters.set("pathname", ColumnFilterValue::Text("/api".to_string()));

        let sql = build_sql_where_clause(&filters, &fields, None);
        assert_eq!(
            sql.clause,
            "WHERE has(?, toString(status)) AND hasAny(regions, ?) AND latency BETWEEN ? AND ? \
             AND positionCaseInsensitive(toString(pathname), ?) > 0"
        );
        assert_eq!(
            sql.params,
            vec![
                SqlParam::TextList(vec!["500".to_string(), "503".to_string()]),
                SqlParam::TextList(vec!["ams".to_string()]),
                SqlParam::Number(10.0),
                SqlParam::Number(200.0),
                SqlParam::Text("/api".to_string()),
            ]
        );
    }

    #[test]
    fn single_instant_covers_its_day() {
        let fields = log_filter_fields().unwrap();
        let mut filters = ColumnFiltersState::new();
        // 2023-11-14T22:13:20Z
        let at = DateTime::from_timestamp_millis(1_700_000_000_000).unwrap();
        filters.set("date", ColumnFilterValue::Timerange(TimeRange::new(at, None)));

        let sql = build_sql_where_clause(&filters, &fields, None);
        assert_eq!(sql.clause, "WHERE toUnixTimestamp64Milli(date) BETWEEN ? AND ?");
        assert_eq!(sql.params, vec![SqlParam::Millis(1_699_920_000_000), SqlParam::Millis(1_700_006_399_999)]);
    }

    #[test]
    fn unregistered_and_skipped_columns_are_left_out() {
        let fields = log_filter_fields().unwrap();
        let mut filters = ColumnFiltersState::new();
        filters.set("host", options(&["a.example.com"]));
        filters.set("1=1; DROP TABLE logs", ColumnFilterValue::Text("x".to_string()));
        filters.set("level", options(&["error"]));

        let sql = build_sql_where_clause(&filters, &fields, Some("host"));
        assert_eq!(sql.clause, "WHERE has(?, toString(level))");
        assert_eq!(sql.params.len(), 1);
    }

    #[test]
    fn order_falls_back_to_newest_first() {
        assert_eq!(build_sql_order_clause(None), "ORDER BY date DESC");
        assert_eq!(build_sql_order_clause(Some(&SortState::new("evil; --", true))), "ORDER BY date DESC");
        assert_eq!(build_sql_order_clause(Some(&SortState::new("date", false))), "ORDER BY date ASC");
        assert_eq!(
            build_sql_order_clause(Some(&SortState::new("latency", true))),
            "ORDER BY latency DESC, date DESC"
        );
    }

    #[test]
    fn facet_expression_unnests_arrays() {
        assert_eq!(facet_value_expr("regions"), "arrayJoin(regions)");
        assert_eq!(facet_value_expr("status"), "toString(status)");
    }
}
