//! Row query of the log table, with counts and facets for the sidebar.

use anyhow::Context;
use chrono::DateTime;
use clickhouse::sql;
use explorer_common::facets::FacetMap;
use explorer_common::filter_field::FilterKind;
use explorer_common::logs::{LogRow, LogsPage, log_filter_fields};
use explorer_common::search_const::MAX_LOADED_ROWS;
use explorer_common::search_params::{RawSearchParams, decode_search_params};
use serde::Deserialize;
use tokio::io::AsyncBufReadExt;
use tracing::info;

use crate::api::logs::facet_counts::{fetch_option_counts, fetch_range_facet};
use crate::api::logs::logs_sql::{SQL_SELECT_COLUMNS, build_sql_order_clause, build_sql_where_clause};
use crate::config::ExplorerConfig;
use crate::db_utils::clickhouse_utils::get_clickhouse_client;

#[derive(Debug, Deserialize)]
struct LogRecord {
    uuid: String,
    /// 64-bit integers come back quoted from `JSONEachRow`.
    date_ms: String,
    level: String,
    status: u16,
    method: String,
    host: String,
    pathname: String,
    latency: f64,
    regions: Vec<String>,
    trace_id: String,
    message: Option<String>,
}

impl TryFrom<LogRecord> for LogRow {
    type Error = anyhow::Error;

    fn try_from(record: LogRecord) -> anyhow::Result<Self> {
        let millis = record.date_ms.parse::<i64>().with_context(|| format!("bad date: {}", record.date_ms))?;
        let Some(date) = DateTime::from_timestamp_millis(millis) else {
            anyhow::bail!("date out of range: {}", millis);
        };
        Ok(LogRow {
            uuid: record.uuid,
            date,
            level: record.level,
            status: record.status,
            method: record.method,
            host: record.host,
            pathname: record.pathname,
            latency: record.latency,
            regions: record.regions,
            trace_id: record.trace_id,
            message: record.message.filter(|m| !m.is_empty()),
        })
    }
}

/// Loads the first `limit` rows matching the URL state.
pub async fn fetch_logs(search: RawSearchParams, limit: u64) -> anyhow::Result<LogsPage> {
    let config = ExplorerConfig::from_env()?;
    let client = get_clickhouse_client(&config);
    let fields = log_filter_fields()?;
    let state = decode_search_params(&search, &fields);
    let limit = limit.clamp(1, MAX_LOADED_ROWS);
    info!("fetch_logs: {} limit {}", search, limit);

    let sql_where = build_sql_where_clause(&state.column_filters, &fields, None);
    let sql_order = build_sql_order_clause(state.sorting.as_ref());
    let query = format!("SELECT {SQL_SELECT_COLUMNS} FROM ? {} {sql_order} LIMIT {limit}", sql_where.clause);
    let query = sql_where.bind(client.query(&query).bind(sql::Identifier(&config.logs_table)));

    let mut lines = query.fetch_bytes("JSONEachRow")?.lines();
    let mut rows = Vec::new();
    while let Some(line) = lines.next_line().await? {
        let record = serde_json::from_str::<LogRecord>(&line).with_context(|| format!("bad log row: {line}"))?;
        rows.push(LogRow::try_from(record)?);
    }

    let total_row_count = client
        .query("SELECT count() FROM ?")
        .bind(sql::Identifier(&config.logs_table))
        .fetch_one::<u64>()
        .await?;
    let filter_row_count = if sql_where.clause.is_empty() {
        total_row_count
    } else {
        let query = format!("SELECT count() FROM ? {}", sql_where.clause);
        sql_where
            .bind(client.query(&query).bind(sql::Identifier(&config.logs_table)))
            .fetch_one::<u64>()
            .await?
    };

    let mut facets = FacetMap::default();
    for field in fields.iter() {
        match &field.kind {
            FilterKind::Checkbox { .. } => {
                for (value, count) in fetch_option_counts(&client, &config, &state, &fields, &field.value, None).await? {
                    facets.insert(&field.value, &value, count);
                }
            }
            FilterKind::Slider { .. } => {
                if let Some(range) = fetch_range_facet(&client, &config, &state, &fields, &field.value).await? {
                    facets.insert(&field.value, &range.min.to_string(), 1);
                    facets.insert(&field.value, &range.max.to_string(), 1);
                }
            }
            FilterKind::Input { .. } | FilterKind::Timerange { .. } => {}
        }
    }

    Ok(LogsPage { rows, facets, total_row_count, filter_row_count })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_converts_to_row() {
        let line = r#"{"uuid":"0b8a","date_ms":"1700000000000","level":"error","status":500,"method":"GET","host":"api.example.com","pathname":"/v1","latency":81.5,"regions":["ams","gru"],"trace_id":"t-1","message":""}"#;
        let record = serde_json::from_str::<LogRecord>(line).unwrap();
        let row = LogRow::try_from(record).unwrap();
        assert_eq!(row.date.timestamp_millis(), 1_700_000_000_000);
        assert_eq!(row.regions, vec!["ams".to_string(), "gru".to_string()]);
        assert_eq!(row.message, None);
    }

    #[test]
    fn unparsable_date_is_an_error() {
        let line = r#"{"uuid":"x","date_ms":"soon","level":"error","status":500,"method":"GET","host":"h","pathname":"/","latency":1.0,"regions":[],"trace_id":"t","message":null}"#;
        let record = serde_json::from_str::<LogRecord>(line).unwrap();
        assert!(LogRow::try_from(record).is_err());
    }
}
