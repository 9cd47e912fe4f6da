//! Per-type text encodings of column filter values.
//!
//! The same encodings are used by the command palette query string and by
//! the URL query parameters: arrays join with `,`, number and time ranges
//! join with `-`, instants are epoch milliseconds.

use chrono::DateTime;

use crate::column_filters::{ColumnFilterValue, NumberRange, TimeRange};
use crate::filter_field::FilterKind;

pub const ARRAY_DELIMITER: char = ',';
pub const RANGE_DELIMITER: char = '-';

/// Decodes `raw` according to the field kind, `None` when malformed.
/// Text is taken verbatim; the other kinds ignore surrounding whitespace.
pub fn decode_value(kind: &FilterKind, raw: &str) -> Option<ColumnFilterValue> {
    if let FilterKind::Input { .. } = kind {
        return (!raw.is_empty()).then(|| ColumnFilterValue::Text(raw.to_string()));
    }
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match kind {
        FilterKind::Checkbox { .. } => {
            let values = raw
                .split(ARRAY_DELIMITER)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>();
            if values.is_empty() { None } else { Some(ColumnFilterValue::Options(values)) }
        }
        FilterKind::Slider { .. } => decode_number_range(raw).map(ColumnFilterValue::Range),
        FilterKind::Timerange { .. } => decode_time_range(raw).map(ColumnFilterValue::Timerange),
        FilterKind::Input { .. } => None,
    }
}

/// Encodes `value` for a field of `kind`, `None` when the shapes disagree.
pub fn encode_value(kind: &FilterKind, value: &ColumnFilterValue) -> Option<String> {
    match (kind, value) {
        (FilterKind::Checkbox { .. }, ColumnFilterValue::Options(values)) if !values.is_empty() => {
            Some(values.join(&ARRAY_DELIMITER.to_string()))
        }
        (FilterKind::Slider { .. }, ColumnFilterValue::Range(range)) => {
            Some(format!("{}{}{}", range.min, RANGE_DELIMITER, range.max))
        }
        (FilterKind::Timerange { .. }, ColumnFilterValue::Timerange(range)) => {
            let start = range.start.timestamp_millis();
            Some(match range.end {
                Some(end) => format!("{}{}{}", start, RANGE_DELIMITER, end.timestamp_millis()),
                None => start.to_string(),
            })
        }
        (FilterKind::Input { .. }, ColumnFilterValue::Text(text)) if !text.is_empty() => Some(text.clone()),
        _ => None,
    }
}

/// Splits on the first delimiter past the first character, so a leading
/// minus sign stays with the lower bound.
pub fn split_range(raw: &str) -> (&str, Option<&str>) {
    let mut chars = raw.char_indices();
    chars.next();
    match chars.find(|(_, c)| *c == RANGE_DELIMITER) {
        Some((index, _)) => (&raw[..index], Some(&raw[index + RANGE_DELIMITER.len_utf8()..])),
        None => (raw, None),
    }
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn decode_number_range(raw: &str) -> Option<NumberRange> {
    match split_range(raw) {
        (single, None) => parse_finite(single).map(|n| NumberRange::new(n, n)),
        (min, Some(max)) => Some(NumberRange::new(parse_finite(min)?, parse_finite(max)?)),
    }
}

fn decode_time_range(raw: &str) -> Option<TimeRange> {
    let millis = |s: &str| s.trim().parse::<i64>().ok().and_then(DateTime::from_timestamp_millis);
    match split_range(raw) {
        (start, None) => Some(TimeRange::new(millis(start)?, None)),
        (start, Some(end)) => Some(TimeRange::new(millis(start)?, Some(millis(end)?))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter_field::FilterOption;

    fn checkbox() -> FilterKind {
        FilterKind::Checkbox { options: vec![FilterOption::plain("ams")], source: Default::default() }
    }

    fn slider() -> FilterKind {
        FilterKind::Slider { min: 0.0, max: 100.0 }
    }

    fn timerange() -> FilterKind {
        FilterKind::Timerange { presets: vec![] }
    }

    #[test]
    fn checkbox_drops_empty_members() {
        assert_eq!(
            decode_value(&checkbox(), "ams,,gru,"),
            Some(ColumnFilterValue::Options(vec!["ams".to_string(), "gru".to_string()]))
        );
        assert_eq!(decode_value(&checkbox(), ",,"), None);
    }

    #[test]
    fn slider_accepts_single_number_as_degenerate_range() {
        assert_eq!(decode_value(&slider(), "42"), Some(ColumnFilterValue::Range(NumberRange::new(42.0, 42.0))));
        assert_eq!(decode_value(&slider(), "-5-10"), Some(ColumnFilterValue::Range(NumberRange::new(-5.0, 10.0))));
    }

    #[test]
    fn malformed_numbers_fail_soft() {
        assert_eq!(decode_value(&slider(), "10-abc"), None);
        assert_eq!(decode_value(&slider(), "NaN"), None);
        assert_eq!(decode_value(&slider(), "10-"), None);
        assert_eq!(decode_value(&timerange(), "yesterday"), None);
    }

    #[test]
    fn timerange_encodes_epoch_millis() {
        let value = decode_value(&timerange(), "1700000000000-1700003600000").unwrap();
        assert_eq!(encode_value(&timerange(), &value).as_deref(), Some("1700000000000-1700003600000"));
        let single = decode_value(&timerange(), "1700000000000").unwrap();
        assert_eq!(encode_value(&timerange(), &single).as_deref(), Some("1700000000000"));
    }

    #[test]
    fn text_is_kept_verbatim() {
        let input = FilterKind::Input { options: vec![] };
        assert_eq!(decode_value(&input, " /api "), Some(ColumnFilterValue::Text(" /api ".to_string())));
        assert_eq!(decode_value(&input, ""), None);
        assert_eq!(decode_value(&checkbox(), " ams "), Some(ColumnFilterValue::Options(vec!["ams".to_string()])));
    }

    #[test]
    fn mismatched_shapes_do_not_encode() {
        let text = ColumnFilterValue::Text("api".to_string());
        assert_eq!(encode_value(&slider(), &text), None);
        assert_eq!(encode_value(&checkbox(), &ColumnFilterValue::Options(vec![])), None);
    }
}
