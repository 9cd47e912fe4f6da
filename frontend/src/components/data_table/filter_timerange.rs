//! Date range filter. Every selection goes through the plan retention check.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use dioxus::prelude::*;
use explorer_common::column_filters::{ColumnFilterValue, TimeRange};
use explorer_common::entitlement::TimerangeDecision;
use explorer_common::filter_field::{FilterField, FilterKind};

use crate::components::data_table::provider::DataTableContext;

const DATETIME_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

fn parse_datetime_input(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw.trim(), DATETIME_INPUT_FORMAT).ok().map(|n| n.and_utc())
}

fn format_datetime_input(at: DateTime<Utc>) -> String {
    at.format(DATETIME_INPUT_FORMAT).to_string()
}

pub(crate) fn describe_range(range: &TimeRange) -> String {
    match range.end {
        Some(end) => format!("{} - {}", range.start.format("%b %d, %H:%M"), end.format("%b %d, %H:%M")),
        None => range.start.format("%b %d, %Y").to_string(),
    }
}

#[component]
pub fn DataTableFilterTimerange(field: ReadSignal<FilterField>) -> Element {
    let ctx = use_context::<DataTableContext>();
    let committed = use_memo(move || match ctx.state.read().column_filters.get(&field.read().value) {
        Some(ColumnFilterValue::Timerange(range)) => Some(*range),
        _ => None,
    });
    let mut start_input = use_signal(String::new);
    let mut end_input = use_signal(String::new);
    use_effect(move || {
        let range = committed();
        start_input.set(range.map(|r| format_datetime_input(r.start)).unwrap_or_default());
        end_input.set(range.and_then(|r| r.end).map(format_datetime_input).unwrap_or_default());
    });
    let mut upgrade_required = use_signal(|| None::<DateTime<Utc>>);

    let mut select = move |range: TimeRange| match ctx.retention.read().check(range, Utc::now()) {
        TimerangeDecision::Commit(range) => {
            upgrade_required.set(None);
            ctx.set_filter(&field.read().value, Some(ColumnFilterValue::Timerange(range)));
        }
        TimerangeDecision::UpgradeRequired { earliest_allowed } => {
            dioxus::logger::tracing::info!("time range before {earliest_allowed} needs a plan upgrade");
            upgrade_required.set(Some(earliest_allowed));
        }
    };

    let presets: Vec<(String, String, i64)> = match &field.read().kind {
        FilterKind::Timerange { presets } => {
            presets.iter().map(|p| (p.label.clone(), p.shortcut.clone(), p.lookback_minutes)).collect()
        }
        _ => Vec::new(),
    };
    let input_style = "width: 100%; border: 1px solid rgba(101, 101, 101, 0.5); border-radius: 6px; padding: 4px 8px; font-size: 13px;";

    rsx! {
        if let Some(range) = committed() {
            div {
                class: "x-mono",
                style: "font-size: 12px; color: rgba(28, 33, 45, 0.8); margin-bottom: 6px;",
                "{describe_range(&range)}"
            }
        }
        div {
            style: "display: flex; flex-direction: row; flex-wrap: wrap; gap: 4px; margin-bottom: 6px;",
            for (label, shortcut, lookback_minutes) in presets {
                button {
                    key: "{shortcut}",
                    style: "border: 1px solid rgba(101, 101, 101, 0.5); border-radius: 6px; background: white; cursor: pointer; font-size: 12px; padding: 2px 8px;",
                    onclick: move |_| {
                        let now = Utc::now();
                        select(TimeRange::new(now - Duration::minutes(lookback_minutes), Some(now)));
                    },
                    "{label}"
                }
            }
        }
        div {
            style: "display: flex; flex-direction: column; gap: 4px;",
            input {
                r#type: "datetime-local",
                style: input_style,
                value: "{start_input}",
                oninput: move |e: Event<FormData>| start_input.set(e.value()),
            }
            input {
                r#type: "datetime-local",
                style: input_style,
                value: "{end_input}",
                oninput: move |e: Event<FormData>| end_input.set(e.value()),
            }
            button {
                style: "border: 1px solid rgba(101, 101, 101, 0.5); border-radius: 6px; background: white; cursor: pointer; font-size: 12px; padding: 4px 8px;",
                onclick: move |_| {
                    let Some(start) = parse_datetime_input(&start_input.read()) else { return };
                    let end = parse_datetime_input(&end_input.read());
                    let (start, end) = match end {
                        Some(end) if end < start => (end, Some(start)),
                        end => (start, end),
                    };
                    select(TimeRange::new(start, end));
                },
                "Apply"
            }
        }
        if let Some(earliest_allowed) = upgrade_required() {
            UpgradePrompt {
                earliest_allowed,
                retention_days: ctx.retention.read().log_retention_days.unwrap_or_default(),
                on_dismiss: move |_| upgrade_required.set(None),
            }
        }
    }
}

#[component]
pub(crate) fn UpgradePrompt(earliest_allowed: DateTime<Utc>, retention_days: u32, on_dismiss: EventHandler<()>) -> Element {
    let earliest = earliest_allowed.format("%b %d, %Y").to_string();
    rsx! {
        div {
            style: "margin-top: 8px; padding: 8px; border: 1px solid #E5A50A; border-radius: 6px; background-color: #FFF8E1; font-size: 13px;",
            p {
                style: "margin: 0 0 6px 0;",
                "Your plan keeps {retention_days} days of logs. Upgrade to query data before {earliest}."
            }
            button {
                style: "border: none; background: none; color: blue; cursor: pointer; padding: 0; font-size: 13px;",
                onclick: move |_| on_dismiss.call(()),
                "Dismiss"
            }
        }
    }
}
