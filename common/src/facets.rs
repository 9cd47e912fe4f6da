//! Row counts per filter option.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::column_filters::{NumberRange, TableRow};
use crate::filter_field::{FilterFieldSet, FilterKind};

/// `column id -> option value -> row count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FacetMap {
    columns: BTreeMap<String, BTreeMap<String, u64>>,
}

/// Facet counts of one column, as returned by the facet-count query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FacetCounts {
    pub column: String,
    pub term: String,
    pub counts: Vec<(String, u64)>,
}

impl FacetMap {
    /// Counts checkbox and slider columns over the loaded rows. List cells
    /// count each distinct member once per row.
    pub fn from_rows<R: TableRow>(rows: &[R], fields: &FilterFieldSet) -> Self {
        let mut facets = Self::default();
        for field in fields.iter() {
            if !matches!(field.kind, FilterKind::Checkbox { .. } | FilterKind::Slider { .. }) {
                continue;
            }
            for row in rows {
                let Some(cell) = row.cell(&field.value) else { continue };
                let mut keys = cell.facet_keys();
                keys.sort();
                keys.dedup();
                for key in keys {
                    facets.insert(&field.value, &key, 1);
                }
            }
        }
        facets
    }

    /// Adds `count` to the bucket of `value` in `column`.
    pub fn insert(&mut self, column: &str, value: &str, count: u64) {
        *self
            .columns
            .entry(column.to_string())
            .or_default()
            .entry(value.to_string())
            .or_insert(0) += count;
    }

    pub fn counts(&self, column: &str) -> Option<&BTreeMap<String, u64>> {
        self.columns.get(column)
    }

    pub fn count(&self, column: &str, value: &str) -> Option<u64> {
        self.columns.get(column)?.get(value).copied()
    }

    /// Smallest and largest numeric key of the column.
    pub fn min_max(&self, column: &str) -> Option<NumberRange> {
        let mut numbers = self
            .columns
            .get(column)?
            .keys()
            .filter_map(|k| k.parse::<f64>().ok())
            .filter(|n| n.is_finite());
        let first = numbers.next()?;
        let (min, max) = numbers.fold((first, first), |(lo, hi), n| (lo.min(n), hi.max(n)));
        Some(NumberRange::new(min, max))
    }

    /// Replaces one column with the result of an async facet query.
    pub fn merge_column(&mut self, counts: &FacetCounts) {
        let column = self.columns.entry(counts.column.clone()).or_default();
        column.clear();
        for (value, count) in &counts.counts {
            *column.entry(value.clone()).or_insert(0) += count;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }
}
