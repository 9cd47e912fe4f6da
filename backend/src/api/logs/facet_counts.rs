//! Per-column facet queries. A column's own filter is left out of its
//! facet so unselected values keep their counts.

use clickhouse::sql;
use explorer_common::column_filters::NumberRange;
use explorer_common::facets::FacetCounts;
use explorer_common::filter_field::{FilterFieldSet, FilterKind};
use explorer_common::logs::log_filter_fields;
use explorer_common::search_const::FACET_LIMIT;
use explorer_common::search_params::{RawSearchParams, decode_search_params};
use explorer_common::table_state::DataTableState;
use tracing::{debug, info};

use crate::api::logs::logs_sql::{build_sql_where_clause, facet_value_expr, is_known_column};
use crate::config::ExplorerConfig;
use crate::db_utils::clickhouse_utils::get_clickhouse_client;

/// Most frequent values of `column`, optionally narrowed to those containing `term`.
pub(crate) async fn fetch_option_counts(
    client: &clickhouse::Client,
    config: &ExplorerConfig,
    state: &DataTableState,
    fields: &FilterFieldSet,
    column: &str,
    term: Option<&str>,
) -> anyhow::Result<Vec<(String, u64)>> {
    if !is_known_column(fields, column) {
        anyhow::bail!("Unknown facet column: {}", column);
    }
    let sql_where = build_sql_where_clause(&state.column_filters, fields, Some(column));
    let term = term.map(str::trim).filter(|t| !t.is_empty());
    let having = if term.is_some() { "HAVING positionCaseInsensitive(value, ?) > 0" } else { "" };
    let query = format!(
        "SELECT {} AS value, count() AS count FROM ? {} GROUP BY value {having} ORDER BY count DESC, value LIMIT {FACET_LIMIT}",
        facet_value_expr(column),
        sql_where.clause,
    );
    debug!("facet query for {}: {}", column, query);
    let mut query = sql_where.bind(client.query(&query).bind(sql::Identifier(&config.logs_table)));
    if let Some(term) = term {
        query = query.bind(term);
    }
    Ok(query.fetch_all::<(String, u64)>().await?)
}

/// Bounds of a numeric column under the other filters; `None` when no row matches.
pub(crate) async fn fetch_range_facet(
    client: &clickhouse::Client,
    config: &ExplorerConfig,
    state: &DataTableState,
    fields: &FilterFieldSet,
    column: &str,
) -> anyhow::Result<Option<NumberRange>> {
    if !is_known_column(fields, column) {
        anyhow::bail!("Unknown facet column: {}", column);
    }
    let sql_where = build_sql_where_clause(&state.column_filters, fields, Some(column));
    let query = format!(
        "SELECT count(), toFloat64(min({column})), toFloat64(max({column})) FROM ? {}",
        sql_where.clause
    );
    let (count, min, max) = sql_where
        .bind(client.query(&query).bind(sql::Identifier(&config.logs_table)))
        .fetch_one::<(u64, f64, f64)>()
        .await?;
    if count == 0 {
        return Ok(None);
    }
    Ok(Some(NumberRange::new(min, max)))
}

/// Facet values for a remote checkbox search box.
pub async fn facet_counts(search: RawSearchParams, column: String, term: String) -> anyhow::Result<FacetCounts> {
    let config = ExplorerConfig::from_env()?;
    let client = get_clickhouse_client(&config);
    let fields = log_filter_fields()?;
    let Some(field) = fields.get(&column) else {
        anyhow::bail!("Unknown facet column: {}", column);
    };
    if !matches!(field.kind, FilterKind::Checkbox { .. }) {
        anyhow::bail!("Column {} has no option facets", column);
    }
    info!("facet_counts: {} term {:?}", column, term);
    let state = decode_search_params(&search, &fields);
    let counts = fetch_option_counts(&client, &config, &state, &fields, &column, Some(&term)).await?;
    Ok(FacetCounts { column, term, counts })
}
