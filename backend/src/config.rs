//! Environment configuration for the backend.

use anyhow::Context;
use explorer_common::entitlement::RetentionPolicy;

#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerConfig {
    pub clickhouse_url: String,
    pub clickhouse_user: String,
    pub clickhouse_password: String,
    pub clickhouse_database: String,
    pub logs_table: String,
    /// Unset means the plan keeps logs forever.
    pub log_retention_days: Option<u32>,
}

impl ExplorerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or(default.to_string());
        let log_retention_days = match lookup("LOG_RETENTION_DAYS").filter(|v| !v.trim().is_empty()) {
            Some(days) => Some(
                days.trim()
                    .parse::<u32>()
                    .with_context(|| format!("LOG_RETENTION_DAYS is not a number: {days}"))?,
            ),
            None => None,
        };
        Ok(Self {
            clickhouse_url: or_default("CLICKHOUSE_URL", "http://localhost:8123"),
            clickhouse_user: or_default("CLICKHOUSE_USER", "explorer"),
            clickhouse_password: or_default("CLICKHOUSE_PASSWORD", "explorer"),
            clickhouse_database: or_default("CLICKHOUSE_DATABASE", "explorer"),
            logs_table: or_default("LOGS_TABLE", "logs"),
            log_retention_days,
        })
    }

    pub fn retention_policy(&self) -> RetentionPolicy {
        match self.log_retention_days {
            Some(days) => RetentionPolicy::days(days),
            None => RetentionPolicy::unlimited(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ExplorerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.clickhouse_url, "http://localhost:8123");
        assert_eq!(config.logs_table, "logs");
        assert_eq!(config.retention_policy(), RetentionPolicy::unlimited());
    }

    #[test]
    fn retention_days_become_policy() {
        let config = ExplorerConfig::from_lookup(lookup(&[("LOG_RETENTION_DAYS", "14"), ("LOGS_TABLE", "http_logs")])).unwrap();
        assert_eq!(config.retention_policy(), RetentionPolicy::days(14));
        assert_eq!(config.logs_table, "http_logs");
    }

    #[test]
    fn bad_retention_is_an_error() {
        assert!(ExplorerConfig::from_lookup(lookup(&[("LOG_RETENTION_DAYS", "two weeks")])).is_err());
    }
}
