//! Command palette tokenizer: the word under the caret, ranked
//! suggestions for it, and in-place replacement of that word.

use chrono::{DateTime, Duration, Utc};

use crate::facets::FacetMap;
use crate::filter_codec::{ARRAY_DELIMITER, split_range};
use crate::filter_field::{FilterField, FilterFieldSet, FilterKind};
use crate::slider::slider_bounds;

/// Whitespace-delimited word around the caret, as a byte range.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WordSpan {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

fn floor_char_boundary(input: &str, index: usize) -> usize {
    let mut index = index.min(input.len());
    while !input.is_char_boundary(index) {
        index -= 1;
    }
    index
}

pub fn current_word(input: &str, caret: usize) -> WordSpan {
    let caret = floor_char_boundary(input, caret);
    let start = input[..caret]
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let end = input[caret..]
        .char_indices()
        .find(|(_, c)| c.is_whitespace())
        .map(|(i, _)| caret + i)
        .unwrap_or(input.len());
    WordSpan { start, end, text: input[start..end].to_string() }
}

/// Converts a browser caret position (UTF-16 code units) to a byte offset.
pub fn caret_from_utf16(input: &str, units: usize) -> usize {
    let mut seen = 0;
    for (index, c) in input.char_indices() {
        if seen >= units {
            return index;
        }
        seen += c.len_utf16();
    }
    input.len()
}

pub fn utf16_from_caret(input: &str, caret: usize) -> usize {
    input[..floor_char_boundary(input, caret)].encode_utf16().count()
}

/// The typed query only drives the filters once the word under the caret
/// is finished, or the palette is closed.
pub fn should_apply_input(open: bool, current_word: &str) -> bool {
    !(open && !current_word.is_empty())
}

/// Text the palette input should be replaced with after the filters
/// changed. The input is never rewritten while the palette is open.
pub fn synced_input(open: bool, input: &str, serialized: String) -> Option<String> {
    if open || input == serialized {
        return None;
    }
    Some(serialized)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionKind {
    Field,
    Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub field: String,
    /// Option value, or the field id for field suggestions.
    pub value: String,
    pub label: String,
    pub count: Option<u64>,
    pub score: f32,
}

/// Ranks `candidate` as a value of `field` for the typed `word`.
///
/// Zero means "do not suggest". Substring matches of the whole
/// `field:candidate` score 1; for checkbox unions a candidate already
/// listed before the last member scores 0, one containing the member being
/// typed scores 1, and any other option scores 0.5 once the last member is
/// empty or a complete option; for slider ranges a candidate above the
/// typed minimum that contains the typed maximum scores 1.
pub fn score(field: &FilterField, candidate: &str, word: &str) -> f32 {
    let word = word.to_lowercase();
    let candidate = candidate.to_lowercase();
    if format!("{}:{}", field.value.to_lowercase(), candidate).contains(&word) {
        return 1.0;
    }
    let Some((name, query)) = word.split_once(':') else {
        return 0.0;
    };
    if name != field.value.to_lowercase() || query.is_empty() {
        return 0.0;
    }
    match &field.kind {
        FilterKind::Checkbox { .. } if query.contains(ARRAY_DELIMITER) => {
            let members = query.split(ARRAY_DELIMITER).collect::<Vec<_>>();
            let last = members.last().copied().unwrap_or("");
            let listed = &members[..members.len().saturating_sub(1)];
            if listed.iter().any(|m| *m == candidate) {
                return 0.0;
            }
            if !last.is_empty() && candidate.contains(last) {
                return 1.0;
            }
            let last_is_complete = field.kind.options().iter().any(|o| o.value.to_lowercase() == last);
            if last.is_empty() || (last_is_complete && last != candidate) { 0.5 } else { 0.0 }
        }
        FilterKind::Slider { .. } => {
            let (min, max) = split_range(query);
            let Some(max) = max else {
                return if candidate.contains(query) { 1.0 } else { 0.0 };
            };
            let (Ok(typed_min), Ok(value)) = (min.parse::<f64>(), candidate.parse::<f64>()) else {
                return 0.0;
            };
            if typed_min < value && candidate.contains(max) { 1.0 } else { 0.0 }
        }
        _ => {
            if candidate.contains(query) { 1.0 } else { 0.0 }
        }
    }
}

fn value_candidates(field: &FilterField, facets: &FacetMap, now: DateTime<Utc>) -> Vec<(String, String, Option<u64>)> {
    let count = |value: &str| facets.count(&field.value, value);
    match &field.kind {
        FilterKind::Checkbox { options, .. } => {
            let mut candidates = options
                .iter()
                .map(|o| (o.value.clone(), o.label.clone(), count(&o.value)))
                .collect::<Vec<_>>();
            if let Some(counts) = facets.counts(&field.value) {
                for (value, n) in counts {
                    if !field.has_option(value) {
                        candidates.push((value.clone(), value.clone(), Some(*n)));
                    }
                }
            }
            candidates
        }
        FilterKind::Input { options } => {
            options.iter().map(|o| (o.value.clone(), o.label.clone(), None)).collect()
        }
        FilterKind::Slider { .. } => {
            let mut candidates = Vec::new();
            if let Some(bounds) = slider_bounds(field, facets) {
                let range = format!("{}-{}", bounds.min, bounds.max);
                candidates.push((range.clone(), range, None));
            }
            if let Some(counts) = facets.counts(&field.value) {
                let mut numbers = counts.iter().filter_map(|(k, n)| Some((k.parse::<f64>().ok()?, k, *n))).collect::<Vec<_>>();
                numbers.sort_by(|a, b| a.0.total_cmp(&b.0));
                candidates.extend(numbers.into_iter().map(|(_, k, n)| (k.clone(), k.clone(), Some(n))));
            }
            candidates
        }
        FilterKind::Timerange { presets } => presets
            .iter()
            .map(|p| {
                let start = now - Duration::minutes(p.lookback_minutes);
                let value = format!("{}-{}", start.timestamp_millis(), now.timestamp_millis());
                (value, p.label.clone(), None)
            })
            .collect(),
    }
}

/// Suggestions for the word under the caret, best first. A bare word
/// suggests field names, `field:partial` suggests values of that field.
pub fn suggestions(fields: &FilterFieldSet, facets: &FacetMap, word: &str, now: DateTime<Utc>) -> Vec<Suggestion> {
    let lowered = word.to_lowercase();
    let Some((name, _)) = word.split_once(':') else {
        return fields
            .command_fields()
            .filter(|f| f.value.to_lowercase().contains(&lowered) || f.label.to_lowercase().contains(&lowered))
            .map(|f| Suggestion {
                kind: SuggestionKind::Field,
                field: f.value.clone(),
                value: f.value.clone(),
                label: f.label.clone(),
                count: None,
                score: 1.0,
            })
            .collect();
    };
    let Some(field) = fields.command_field(name) else {
        return Vec::new();
    };

    let mut ranked = value_candidates(field, facets, now)
        .into_iter()
        .filter_map(|(value, label, count)| {
            let mut score = score(field, &value, word);
            if score == 0.0 && matches!(field.kind, FilterKind::Timerange { .. }) {
                let partial = lowered.split_once(':').map(|(_, q)| q).unwrap_or("");
                if label.to_lowercase().contains(partial) {
                    score = 1.0;
                }
            }
            (score > 0.0).then(|| Suggestion {
                kind: SuggestionKind::Value,
                field: field.value.clone(),
                value,
                label,
                count,
                score,
            })
        })
        .collect::<Vec<_>>();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

/// Result of splicing a suggestion into the input buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub input: String,
    /// Byte offset of the caret after the edit.
    pub caret: usize,
}

/// Replaces only `span` in `input` with the chosen suggestion, keeping the
/// rest of the typed text verbatim.
pub fn apply_suggestion(input: &str, span: &WordSpan, suggestion: &Suggestion, fields: &FilterFieldSet) -> Edit {
    let (replacement, ensure_space) = match suggestion.kind {
        SuggestionKind::Field => (format!("{}:", suggestion.field), false),
        SuggestionKind::Value => {
            let partial = span.text.split_once(':').map(|(_, q)| q).unwrap_or("");
            let is_checkbox = matches!(fields.get(&suggestion.field).map(|f| &f.kind), Some(FilterKind::Checkbox { .. }));
            let value = if is_checkbox && partial.contains(ARRAY_DELIMITER) {
                let mut members = partial.split(ARRAY_DELIMITER).map(str::to_string).collect::<Vec<_>>();
                let last = members.pop().unwrap_or_default();
                let completes_last = suggestion.value.to_lowercase().contains(&last.to_lowercase());
                if !completes_last {
                    members.push(last);
                }
                members.push(suggestion.value.clone());
                members.join(&ARRAY_DELIMITER.to_string())
            } else {
                suggestion.value.clone()
            };
            (format!("{}:{}", suggestion.field, value), true)
        }
    };

    let (head, tail) = (&input[..span.start], &input[span.end..]);
    let mut out = String::with_capacity(input.len() + replacement.len() + 1);
    out.push_str(head);
    out.push_str(&replacement);
    let mut caret = out.len();
    if ensure_space {
        if !tail.starts_with(char::is_whitespace) {
            out.push(' ');
        }
        caret += 1;
    }
    out.push_str(tail);
    Edit { input: out, caret }
}

/// Moves the highlighted suggestion by `delta`, wrapping around.
pub fn step_selection(current: Option<usize>, len: usize, delta: isize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let len = len as isize;
    let next = match current {
        Some(index) => (index as isize + delta).rem_euclid(len),
        None if delta < 0 => len - 1,
        None => 0,
    };
    Some(next as usize)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::filter_field::{FilterOption, TimerangePreset};

    fn regions() -> FilterField {
        FilterField::checkbox(
            "regions",
            "Regions",
            ["ams", "gru", "fra", "hkg"].into_iter().map(FilterOption::plain).collect(),
        )
    }

    fn fields() -> FilterFieldSet {
        FilterFieldSet::new(vec![
            regions(),
            FilterField::slider("latency", "Latency", 0.0, 5000.0),
            FilterField::input("path", "Path"),
            FilterField::timerange("date", "Date", vec![TimerangePreset::new("Last hour", "h", 60)]),
            FilterField::input("trace", "Trace").with_command_disabled(true),
        ])
        .unwrap()
    }

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp_millis(1_700_000_000_000).unwrap()
    }

    #[test]
    fn union_scoring_skips_listed_members() {
        let field = regions();
        assert!(score(&field, "fra", "regions:ams,gru") > 0.0);
        assert_eq!(score(&field, "ams", "regions:ams,gru"), 0.0);
        assert_eq!(score(&field, "gru", "regions:ams,gru"), 1.0);
    }

    #[test]
    fn union_scoring_with_partial_last_member() {
        let field = regions();
        assert_eq!(score(&field, "fra", "regions:ams,fr"), 1.0);
        assert_eq!(score(&field, "hkg", "regions:ams,fr"), 0.0);
        assert_eq!(score(&field, "hkg", "regions:ams,"), 0.5);
    }

    #[test]
    fn plain_containment_always_matches() {
        assert_eq!(score(&regions(), "ams", "regions:a"), 1.0);
        assert_eq!(score(&regions(), "ams", "ions:am"), 1.0);
        assert_eq!(score(&regions(), "ams", "regions:x"), 0.0);
    }

    #[test]
    fn slider_scoring_uses_typed_minimum() {
        let field = FilterField::slider("latency", "Latency", 0.0, 5000.0);
        assert_eq!(score(&field, "250", "latency:100-25"), 1.0);
        assert_eq!(score(&field, "25", "latency:100-25"), 0.0);
        assert_eq!(score(&field, "400", "latency:100-25"), 0.0);
    }

    #[test]
    fn current_word_under_caret() {
        let input = "level:error regions:ams,gr path:/api";
        let caret = input.find("gr ").unwrap() + 2;
        let word = current_word(input, caret);
        assert_eq!(word.text, "regions:ams,gr");
        assert_eq!(&input[word.start..word.end], "regions:ams,gr");

        assert_eq!(current_word("level:error ", 12).text, "");
        assert_eq!(current_word("", 5), WordSpan::default());
    }

    #[test]
    fn utf16_caret_conversion() {
        let input = "path:é😀 x";
        let caret = caret_from_utf16(input, 8);
        assert_eq!(&input[..caret], "path:é😀");
        assert_eq!(utf16_from_caret(input, caret), 8);
    }

    #[test]
    fn bare_word_suggests_command_fields() {
        let names = suggestions(&fields(), &FacetMap::default(), "", now())
            .into_iter()
            .map(|s| s.field)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["regions", "latency", "path", "date"]);

        let names = suggestions(&fields(), &FacetMap::default(), "lat", now());
        assert_eq!(names.len(), 1);
        assert_eq!(names[0].kind, SuggestionKind::Field);
    }

    #[test]
    fn value_suggestions_rank_completions_first() {
        let ranked = suggestions(&fields(), &FacetMap::default(), "regions:ams,gru", now());
        let values = ranked.iter().map(|s| s.value.as_str()).collect::<Vec<_>>();
        assert_eq!(values, vec!["gru", "fra", "hkg"]);
    }

    #[test]
    fn facet_values_outside_options_are_suggested_with_counts() {
        let mut facets = FacetMap::default();
        facets.insert("regions", "syd", 3);
        facets.insert("regions", "ams", 9);
        let ranked = suggestions(&fields(), &facets, "regions:", now());
        let ams = ranked.iter().find(|s| s.value == "ams").unwrap();
        let syd = ranked.iter().find(|s| s.value == "syd").unwrap();
        assert_eq!((ams.count, syd.count), (Some(9), Some(3)));
    }

    #[test]
    fn timerange_presets_resolve_against_now() {
        let ranked = suggestions(&fields(), &FacetMap::default(), "date:hour", now());
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].value, "1699996400000-1700000000000");
    }

    #[test]
    fn unknown_or_disabled_field_has_no_value_suggestions() {
        assert!(suggestions(&fields(), &FacetMap::default(), "trace:a", now()).is_empty());
        assert!(suggestions(&fields(), &FacetMap::default(), "nope:a", now()).is_empty());
    }

    #[test]
    fn selecting_a_field_inserts_colon_without_space() {
        let input = "level:error reg path:/api";
        let span = current_word(input, 15);
        let suggestion = suggestions(&fields(), &FacetMap::default(), &span.text, now()).remove(0);
        let edit = apply_suggestion(input, &span, &suggestion, &fields());
        assert_eq!(edit.input, "level:error regions: path:/api");
        assert_eq!(&edit.input[..edit.caret], "level:error regions:");
    }

    #[test]
    fn selecting_a_union_member_splices_only_the_current_word() {
        let input = "path:/api regions:ams,fr latency:1-2";
        let span = current_word(input, input.find(" latency").unwrap());
        let fra = suggestions(&fields(), &FacetMap::default(), &span.text, now())
            .into_iter()
            .find(|s| s.value == "fra")
            .unwrap();
        let edit = apply_suggestion(input, &span, &fra, &fields());
        assert_eq!(edit.input, "path:/api regions:ams,fra latency:1-2");
        assert_eq!(&edit.input[..edit.caret], "path:/api regions:ams,fra ");
    }

    #[test]
    fn selecting_after_a_complete_member_appends() {
        let input = "regions:ams,gru";
        let span = current_word(input, input.len());
        let fra = suggestions(&fields(), &FacetMap::default(), &span.text, now())
            .into_iter()
            .find(|s| s.value == "fra")
            .unwrap();
        let edit = apply_suggestion(input, &span, &fra, &fields());
        assert_eq!(edit.input, "regions:ams,gru,fra ");
        assert_eq!(edit.caret, edit.input.len());
    }

    #[test]
    fn input_sync_waits_for_finished_word() {
        assert!(!should_apply_input(true, "regions:am"));
        assert!(should_apply_input(true, ""));
        assert!(should_apply_input(false, "regions:am"));
    }

    #[test]
    fn open_palette_input_is_never_rewritten() {
        assert_eq!(synced_input(true, "latency:10-abc ", String::new()), None);
        assert_eq!(synced_input(true, "status: ", String::new()), None);
        assert_eq!(synced_input(true, "level:error  path:/api ", "level:error path:/api ".to_string()), None);
    }

    #[test]
    fn closed_palette_input_follows_filters() {
        assert_eq!(synced_input(false, "status:2 ", "status:2,3 ".to_string()), Some("status:2,3 ".to_string()));
        assert_eq!(synced_input(false, "status:2,3 ", "status:2,3 ".to_string()), None);
    }

    #[test]
    fn selection_wraps_around() {
        assert_eq!(step_selection(None, 3, 1), Some(0));
        assert_eq!(step_selection(None, 3, -1), Some(2));
        assert_eq!(step_selection(Some(2), 3, 1), Some(0));
        assert_eq!(step_selection(Some(0), 3, -1), Some(2));
        assert_eq!(step_selection(Some(0), 0, 1), None);
    }
}
