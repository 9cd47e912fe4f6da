//! Bounds handling for slider filters.

use crate::column_filters::NumberRange;
use crate::facets::FacetMap;
use crate::filter_field::{FilterField, FilterKind};

/// Faceted min/max of the column when known, else the configured bounds.
pub fn slider_bounds(field: &FilterField, facets: &FacetMap) -> Option<NumberRange> {
    let FilterKind::Slider { min, max } = field.kind else {
        return None;
    };
    Some(facets.min_max(&field.value).unwrap_or(NumberRange::new(min, max)))
}

/// Clamps both ends into `bounds` and orders them.
pub fn clamp_range(value: NumberRange, bounds: NumberRange) -> NumberRange {
    let clamp = |n: f64| n.max(bounds.min).min(bounds.max);
    let (a, b) = (clamp(value.min), clamp(value.max));
    if a <= b { NumberRange::new(a, b) } else { NumberRange::new(b, a) }
}

/// Parses the two text inputs of a slider into a clamped range, `None`
/// unless both parse.
pub fn commit_from_inputs(min: &str, max: &str, bounds: NumberRange) -> Option<NumberRange> {
    let min = min.trim().parse::<f64>().ok().filter(|n| n.is_finite())?;
    let max = max.trim().parse::<f64>().ok().filter(|n| n.is_finite())?;
    Some(clamp_range(NumberRange::new(min, max), bounds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_value_clamps_to_configured_max() {
        let field = FilterField::slider("latency", "Latency", 0.0, 100.0);
        let bounds = slider_bounds(&field, &FacetMap::default()).unwrap();
        assert_eq!(bounds, NumberRange::new(0.0, 100.0));
        assert_eq!(clamp_range(NumberRange::new(20.0, 150.0), bounds), NumberRange::new(20.0, 100.0));
        assert_eq!(commit_from_inputs("150", "150", bounds), Some(NumberRange::new(100.0, 100.0)));
    }

    #[test]
    fn inverted_input_is_reordered() {
        let bounds = NumberRange::new(0.0, 100.0);
        assert_eq!(clamp_range(NumberRange::new(80.0, -3.0), bounds), NumberRange::new(0.0, 80.0));
    }

    #[test]
    fn faceted_bounds_take_precedence() {
        let field = FilterField::slider("latency", "Latency", 0.0, 100.0);
        let mut facets = FacetMap::default();
        facets.insert("latency", "12", 1);
        facets.insert("latency", "48", 3);
        assert_eq!(slider_bounds(&field, &facets), Some(NumberRange::new(12.0, 48.0)));
    }

    #[test]
    fn half_typed_inputs_do_not_commit() {
        let bounds = NumberRange::new(0.0, 100.0);
        assert_eq!(commit_from_inputs("10", "", bounds), None);
        assert_eq!(commit_from_inputs("x", "20", bounds), None);
    }

    #[test]
    fn non_slider_fields_have_no_bounds() {
        assert_eq!(slider_bounds(&FilterField::input("path", "Path"), &FacetMap::default()), None);
    }
}
