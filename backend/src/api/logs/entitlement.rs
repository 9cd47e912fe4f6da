use explorer_common::entitlement::RetentionPolicy;

use crate::config::ExplorerConfig;

/// Retention of the current plan, which bounds selectable time ranges.
pub async fn plan_entitlement() -> anyhow::Result<RetentionPolicy> {
    Ok(ExplorerConfig::from_env()?.retention_policy())
}
