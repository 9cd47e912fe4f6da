//! Client API calls for the log table.

use explorer_common::{entitlement::RetentionPolicy, facets::FacetCounts, logs::LogsPage, search_params::RawSearchParams};
use dioxus::prelude::*;

#[server]
pub async fn fetch_logs(search: RawSearchParams, limit: u64) -> Result<LogsPage, ServerFnError> {
    let x = explorer_backend::api::logs::fetch_logs(search, limit).await;
    x.map_err(|e| ServerFnError::ServerError { message: e.to_string(), code: 500, details: None })
}

#[server]
pub async fn facet_counts(search: RawSearchParams, column: String, term: String) -> Result<FacetCounts, ServerFnError> {
    let x = explorer_backend::api::logs::facet_counts(search, column, term).await;
    x.map_err(|e| ServerFnError::ServerError { message: e.to_string(), code: 500, details: None })
}

#[server]
pub async fn plan_entitlement() -> Result<RetentionPolicy, ServerFnError> {
    let x = explorer_backend::api::logs::plan_entitlement().await;
    x.map_err(|e| ServerFnError::ServerError { message: e.to_string(), code: 500, details: None })
}
