use axum::{body::Body, extract::RawQuery, http::StatusCode, response::{IntoResponse, Response}};
use explorer_common::logs::LogRow;
use explorer_common::search_const::MAX_LOADED_ROWS;
use explorer_common::search_params::RawSearchParams;
use tracing::info;

use crate::api::logs::fetch_logs;

pub const EXPORT_FILENAME: &str = "logs.ndjson";

/// One JSON object per line.
pub fn render_ndjson(rows: &[LogRow]) -> anyhow::Result<String> {
    let mut out = String::new();
    for row in rows {
        out.push_str(&serde_json::to_string(row)?);
        out.push('\n');
    }
    Ok(out)
}

async fn _export_logs(query: Option<String>) -> anyhow::Result<impl IntoResponse> {
    let search = RawSearchParams::from(query.as_deref().unwrap_or_default());
    info!("Exporting logs: {}", search);
    let page = fetch_logs(search, MAX_LOADED_ROWS).await?;
    let headers = [
        ("Content-Type".to_string(), "application/x-ndjson".to_string()),
        ("Content-Disposition".to_string(), format!("attachment; filename=\"{}\"", EXPORT_FILENAME)),
    ];
    Ok((headers, Body::from(render_ndjson(&page.rows)?)))
}

/// `GET /_export_logs?<search>`: the filtered rows as a download.
pub async fn export_logs(RawQuery(query): RawQuery) -> Response {
    match _export_logs(query).await {
        Ok(response) => response.into_response(),
        Err(e) => {
            tracing::error!("export_logs: request failed: {:#?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Body::from(e.to_string())).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;

    #[test]
    fn one_line_per_row() {
        let row = LogRow {
            uuid: "a".to_string(),
            date: DateTime::from_timestamp_millis(0).unwrap(),
            level: "success".to_string(),
            status: 200,
            method: "GET".to_string(),
            host: "h".to_string(),
            pathname: "/".to_string(),
            latency: 1.0,
            regions: vec![],
            trace_id: "t".to_string(),
            message: None,
        };
        let out = render_ndjson(&[row.clone(), row]).unwrap();
        assert_eq!(out.lines().count(), 2);
        assert!(out.ends_with('\n'));
        let first = serde_json::from_str::<LogRow>(out.lines().next().unwrap()).unwrap();
        assert_eq!(first.status, 200);
    }
}
