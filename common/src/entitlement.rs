//! Plan limits that gate filter commits.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::column_filters::{ColumnFilterValue, TimeRange};
use crate::query_string::ParsedQuery;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionPolicy {
    /// Days of logs kept by the current plan, `None` when unlimited.
    pub log_retention_days: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerangeDecision {
    Commit(TimeRange),
    /// The range starts before the oldest retained log.
    UpgradeRequired { earliest_allowed: DateTime<Utc> },
}

impl RetentionPolicy {
    pub fn unlimited() -> Self {
        Self { log_retention_days: None }
    }

    pub fn days(days: u32) -> Self {
        Self { log_retention_days: Some(days) }
    }

    pub fn earliest_allowed(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.log_retention_days.map(|days| now - Duration::days(i64::from(days)))
    }

    pub fn check(&self, range: TimeRange, now: DateTime<Utc>) -> TimerangeDecision {
        match self.earliest_allowed(now) {
            Some(earliest_allowed) if range.start < earliest_allowed => {
                TimerangeDecision::UpgradeRequired { earliest_allowed }
            }
            _ => TimerangeDecision::Commit(range),
        }
    }

    /// Holds back typed time ranges that start before retention; they keep
    /// their previous value like malformed input. Returns the earliest
    /// allowed instant when anything was held back.
    pub fn gate_query(&self, parsed: &mut ParsedQuery, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let mut earliest = None;
        let blocked = parsed
            .filters
            .iter()
            .filter_map(|filter| match &filter.value {
                ColumnFilterValue::Timerange(range) => match self.check(*range, now) {
                    TimerangeDecision::UpgradeRequired { earliest_allowed } => {
                        earliest = Some(earliest_allowed);
                        Some(filter.id.clone())
                    }
                    TimerangeDecision::Commit(_) => None,
                },
                _ => None,
            })
            .collect::<Vec<_>>();
        for id in blocked {
            parsed.filters.remove(&id);
            parsed.malformed.insert(id);
        }
        earliest
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::unlimited()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_700_000_000_000).unwrap()
    }

    #[test]
    fn start_beyond_retention_requires_upgrade() {
        let policy = RetentionPolicy::days(14);
        let range = TimeRange::new(now() - Duration::days(30), Some(now()));
        assert_eq!(
            policy.check(range, now()),
            TimerangeDecision::UpgradeRequired { earliest_allowed: now() - Duration::days(14) }
        );
    }

    #[test]
    fn start_within_retention_commits() {
        let policy = RetentionPolicy::days(14);
        let range = TimeRange::new(now() - Duration::days(14), None);
        assert_eq!(policy.check(range, now()), TimerangeDecision::Commit(range));
    }

    #[test]
    fn typed_range_beyond_retention_keeps_previous_value() {
        use crate::column_filters::ColumnFiltersState;
        use crate::filter_field::{FilterField, FilterFieldSet, FilterOption};
        use crate::query_string::parse;

        let fields = FilterFieldSet::new(vec![
            FilterField::checkbox("level", "Level", vec![FilterOption::plain("error")]),
            FilterField::timerange("date", "Date", vec![]),
        ])
        .unwrap();
        let recent = TimeRange::new(now() - Duration::days(1), None);
        let mut state = ColumnFiltersState::new();
        state.set("date", ColumnFilterValue::Timerange(recent));

        let old = (now() - Duration::days(30)).timestamp_millis();
        let mut parsed = parse(&format!("level:error date:{old}"), &fields);
        let earliest = RetentionPolicy::days(14).gate_query(&mut parsed, now());
        assert_eq!(earliest, Some(now() - Duration::days(14)));

        parsed.apply(&mut state, &fields);
        assert_eq!(state.get("date"), Some(&ColumnFilterValue::Timerange(recent)));
        assert!(state.get("level").is_some());
    }

    #[test]
    fn unlimited_plan_lets_typed_ranges_through() {
        let mut parsed = ParsedQuery::default();
        let range = TimeRange::new(now() - Duration::days(3650), None);
        parsed.filters.set("date", ColumnFilterValue::Timerange(range));
        assert_eq!(RetentionPolicy::unlimited().gate_query(&mut parsed, now()), None);
        assert!(parsed.filters.get("date").is_some());
    }

    #[test]
    fn unlimited_plan_always_commits() {
        let range = TimeRange::new(now() - Duration::days(3650), None);
        assert_eq!(RetentionPolicy::unlimited().check(range, now()), TimerangeDecision::Commit(range));
    }
}
