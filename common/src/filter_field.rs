//! Declarative description of the filterable columns of a table.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOption {
    pub label: String,
    pub value: String,
}

impl FilterOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self { label: label.into(), value: value.into() }
    }

    /// Option whose label is its value.
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self { label: value.clone(), value }
    }
}

/// Where a checkbox field gets its options from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OptionsSource {
    /// Options are known up front, counts come from the loaded facets.
    #[default]
    Loaded,
    /// Options are searched on the server as the user types.
    Remote,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerangePreset {
    pub label: String,
    /// Shortcut shown next to the label and accepted by the picker, e.g. `"h"`.
    pub shortcut: String,
    pub lookback_minutes: i64,
}

impl TimerangePreset {
    pub fn new(label: impl Into<String>, shortcut: impl Into<String>, lookback_minutes: i64) -> Self {
        Self { label: label.into(), shortcut: shortcut.into(), lookback_minutes }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterKind {
    Checkbox {
        options: Vec<FilterOption>,
        #[serde(default)]
        source: OptionsSource,
    },
    Slider {
        min: f64,
        max: f64,
    },
    Input {
        #[serde(default)]
        options: Vec<FilterOption>,
    },
    Timerange {
        #[serde(default)]
        presets: Vec<TimerangePreset>,
    },
}

impl FilterKind {
    /// Options offered for this kind, empty for sliders and timeranges.
    pub fn options(&self) -> &[FilterOption] {
        match self {
            Self::Checkbox { options, .. } | Self::Input { options } => options,
            Self::Slider { .. } | Self::Timerange { .. } => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterField {
    /// Column id, unique per table.
    pub value: String,
    pub label: String,
    pub kind: FilterKind,
    #[serde(default)]
    pub default_open: bool,
    /// Excludes the field from the command palette syntax.
    #[serde(default)]
    pub command_disabled: bool,
}

impl FilterField {
    fn new(value: impl Into<String>, label: impl Into<String>, kind: FilterKind) -> Self {
        Self { value: value.into(), label: label.into(), kind, default_open: false, command_disabled: false }
    }

    pub fn checkbox(value: impl Into<String>, label: impl Into<String>, options: Vec<FilterOption>) -> Self {
        Self::new(value, label, FilterKind::Checkbox { options, source: OptionsSource::Loaded })
    }

    pub fn remote_checkbox(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(value, label, FilterKind::Checkbox { options: Vec::new(), source: OptionsSource::Remote })
    }

    pub fn slider(value: impl Into<String>, label: impl Into<String>, min: f64, max: f64) -> Self {
        Self::new(value, label, FilterKind::Slider { min, max })
    }

    pub fn input(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(value, label, FilterKind::Input { options: Vec::new() })
    }

    pub fn timerange(value: impl Into<String>, label: impl Into<String>, presets: Vec<TimerangePreset>) -> Self {
        Self::new(value, label, FilterKind::Timerange { presets })
    }

    pub fn with_default_open(mut self, default_open: bool) -> Self {
        self.default_open = default_open;
        self
    }

    pub fn with_command_disabled(mut self, command_disabled: bool) -> Self {
        self.command_disabled = command_disabled;
        self
    }

    pub fn with_options(mut self, new_options: Vec<FilterOption>) -> Self {
        match &mut self.kind {
            FilterKind::Checkbox { options, .. } | FilterKind::Input { options } => *options = new_options,
            FilterKind::Slider { .. } | FilterKind::Timerange { .. } => {}
        }
        self
    }

    /// True when `value` is one of the declared options.
    pub fn has_option(&self, value: &str) -> bool {
        self.kind.options().iter().any(|o| o.value == value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterConfigError {
    DuplicateField(String),
    InvalidBounds { field: String, min: f64, max: f64 },
}

impl std::fmt::Display for FilterConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateField(field) => write!(f, "filter field registered twice: {}", field),
            Self::InvalidBounds { field, min, max } => {
                write!(f, "slider field {} has invalid bounds [{}, {}]", field, min, max)
            }
        }
    }
}

impl std::error::Error for FilterConfigError {}

/// The registered filter fields of one table, in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FilterFieldSet {
    fields: Vec<FilterField>,
}

impl FilterFieldSet {
    pub fn new(fields: Vec<FilterField>) -> Result<Self, FilterConfigError> {
        let mut seen = std::collections::BTreeSet::new();
        for field in &fields {
            if !seen.insert(field.value.as_str()) {
                return Err(FilterConfigError::DuplicateField(field.value.clone()));
            }
            if let FilterKind::Slider { min, max } = field.kind {
                if !(min.is_finite() && max.is_finite() && min <= max) {
                    return Err(FilterConfigError::InvalidBounds { field: field.value.clone(), min, max });
                }
            }
        }
        Ok(Self { fields })
    }

    pub fn get(&self, id: &str) -> Option<&FilterField> {
        self.fields.iter().find(|f| f.value == id)
    }

    /// Field usable from the command palette and its query string.
    pub fn command_field(&self, id: &str) -> Option<&FilterField> {
        self.get(id).filter(|f| !f.command_disabled)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FilterField> {
        self.fields.iter()
    }

    pub fn command_fields(&self) -> impl Iterator<Item = &FilterField> {
        self.fields.iter().filter(|f| !f.command_disabled)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_duplicate_field_ids() {
        let result = FilterFieldSet::new(vec![
            FilterField::input("path", "Path"),
            FilterField::input("path", "Pathname"),
        ]);
        assert_eq!(result, Err(FilterConfigError::DuplicateField("path".to_string())));
    }

    #[test]
    fn rejects_inverted_slider_bounds() {
        let result = FilterFieldSet::new(vec![FilterField::slider("latency", "Latency", 100.0, 0.0)]);
        assert!(matches!(result, Err(FilterConfigError::InvalidBounds { .. })));
    }

    #[test]
    fn command_field_skips_disabled_fields() {
        let fields = FilterFieldSet::new(vec![
            FilterField::input("path", "Path"),
            FilterField::input("trace", "Trace").with_command_disabled(true),
        ])
        .unwrap();
        assert!(fields.command_field("path").is_some());
        assert!(fields.command_field("trace").is_none());
        assert!(fields.get("trace").is_some());
        assert_eq!(fields.command_fields().count(), 1);
    }

    #[test]
    fn options_only_exist_for_checkbox_and_input() {
        let checkbox = FilterField::checkbox("level", "Level", vec![FilterOption::plain("error")]);
        let slider = FilterField::slider("latency", "Latency", 0.0, 10.0).with_options(vec![FilterOption::plain("x")]);
        assert!(checkbox.has_option("error"));
        assert!(slider.kind.options().is_empty());
    }
}
