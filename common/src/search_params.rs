//! URL query parameters of the log table.
//!
//! `RawSearchParams` is the untyped `key=value&...` list carried by the
//! route; it is decoded against the registered fields into a
//! `DataTableState` and encoded back from one.

use std::fmt::Display;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use serde::{Deserialize, Serialize};

use crate::filter_codec::{decode_value, encode_value};
use crate::filter_field::{FilterFieldSet, FilterKind};
use crate::table_state::{DataTableState, SortState};

pub const SORT_PARAM: &str = "sort";
pub const UUID_PARAM: &str = "uuid";
pub const LIVE_PARAM: &str = "live";

const PARAM_VALUE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~').remove(b',');

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RawSearchParams(pub Vec<(String, String)>);

impl RawSearchParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn decode_component(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    percent_decode_str(&raw).decode_utf8_lossy().into_owned()
}

impl From<&str> for RawSearchParams {
    fn from(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((key, value)) => (decode_component(key), decode_component(value)),
                None => (decode_component(pair), String::new()),
            })
            .collect();
        Self(pairs)
    }
}

impl Display for RawSearchParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, (key, value)) in self.0.iter().enumerate() {
            if index > 0 {
                write!(f, "&")?;
            }
            write!(f, "{}={}", utf8_percent_encode(key, PARAM_VALUE), utf8_percent_encode(value, PARAM_VALUE))?;
        }
        Ok(())
    }
}

/// Builds table state from the URL. Unknown keys and malformed values are
/// dropped; a time range or sort wins over `live`.
pub fn decode_search_params(raw: &RawSearchParams, fields: &FilterFieldSet) -> DataTableState {
    let mut state = DataTableState::default();
    let mut live = false;
    for (key, value) in &raw.0 {
        match key.as_str() {
            SORT_PARAM => state.sorting = SortState::decode(value),
            UUID_PARAM => state.select_only(Some(value.as_str()).filter(|v| !v.is_empty())),
            LIVE_PARAM => live = value == "true",
            _ => {
                let Some(field) = fields.get(key) else { continue };
                if let Some(decoded) = decode_value(&field.kind, value) {
                    state.column_filters.set(key.clone(), decoded);
                }
            }
        }
    }
    let has_timerange = state
        .column_filters
        .iter()
        .any(|f| matches!(fields.get(&f.id).map(|field| &field.kind), Some(FilterKind::Timerange { .. })));
    state.live = live && !has_timerange && state.sorting.is_none();
    state
}

/// Filters first in state order, then sort, selected row and live flag.
pub fn encode_search_params(state: &DataTableState, fields: &FilterFieldSet) -> RawSearchParams {
    let mut raw = RawSearchParams::default();
    for filter in state.column_filters.iter() {
        let Some(field) = fields.get(&filter.id) else { continue };
        if let Some(encoded) = encode_value(&field.kind, &filter.value) {
            raw.push(filter.id.clone(), encoded);
        }
    }
    if let Some(sort) = &state.sorting {
        raw.push(SORT_PARAM, sort.encode());
    }
    if let Some(row) = state.selected_row() {
        raw.push(UUID_PARAM, row);
    }
    if state.live {
        raw.push(LIVE_PARAM, "true");
    }
    raw
}
