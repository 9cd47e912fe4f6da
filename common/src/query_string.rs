//! Command palette query string: `field:value` tokens separated by spaces.
//!
//! ```
//! use explorer_common::filter_field::{FilterField, FilterFieldSet, FilterOption};
//! use explorer_common::query_string::{parse, serialize};
//!
//! let fields = FilterFieldSet::new(vec![
//!     FilterField::checkbox("status", "Status", vec![FilterOption::plain("2"), FilterOption::plain("3")]),
//!     FilterField::input("path", "Path"),
//! ]).unwrap();
//! let parsed = parse("status:2,3 path:api", &fields);
//! assert_eq!(serialize(&parsed.filters, &fields), "status:2,3 path:api ");
//! ```

use std::collections::BTreeSet;

use crate::column_filters::ColumnFiltersState;
use crate::filter_codec::{decode_value, encode_value};
use crate::filter_field::FilterFieldSet;

/// One `name:value` occurrence in the input, as byte ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub name: &'a str,
    pub value: &'a str,
    pub start: usize,
    pub end: usize,
}

pub(crate) fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

/// Finds every `name:value` token. A name starts at the beginning of the
/// input or right after whitespace; its value runs up to the whitespace
/// before the next name, so values keep inner spaces and colons.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    let chars = input.char_indices().collect::<Vec<_>>();
    let mut starts = Vec::new();
    let mut after_whitespace = true;
    let mut i = 0;
    while i < chars.len() {
        let (pos, c) = chars[i];
        if after_whitespace && is_name_char(c) {
            let mut j = i;
            while j < chars.len() && is_name_char(chars[j].1) {
                j += 1;
            }
            if j < chars.len() && chars[j].1 == ':' {
                starts.push((pos, chars[j].0));
                i = j + 1;
            } else {
                i = j;
            }
            after_whitespace = false;
            continue;
        }
        after_whitespace = c.is_whitespace();
        i += 1;
    }

    let mut tokens = Vec::with_capacity(starts.len());
    for (index, &(name_start, colon)) in starts.iter().enumerate() {
        let end = starts.get(index + 1).map(|&(next, _)| next).unwrap_or(input.len());
        tokens.push(Token {
            name: &input[name_start..colon],
            value: input[colon + 1..end].trim(),
            start: name_start,
            end,
        });
    }
    tokens
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedQuery {
    /// Decoded values in order of first appearance.
    pub filters: ColumnFiltersState,
    /// Registered fields whose value could not be decoded.
    pub malformed: BTreeSet<String>,
}

impl ParsedQuery {
    /// Applies the parsed values onto `state`. Malformed fields keep their
    /// previous value, other command fields missing from the query are
    /// cleared, command-disabled fields are never touched.
    pub fn apply(&self, state: &mut ColumnFiltersState, fields: &FilterFieldSet) {
        for filter in self.filters.iter() {
            state.set(filter.id.clone(), filter.value.clone());
        }
        for field in fields.command_fields() {
            if self.filters.get(&field.value).is_none() && !self.malformed.contains(&field.value) {
                state.remove(&field.value);
            }
        }
    }
}

pub fn parse(input: &str, fields: &FilterFieldSet) -> ParsedQuery {
    let mut parsed = ParsedQuery::default();
    for token in tokenize(input) {
        let Some(field) = fields.command_field(token.name) else {
            continue;
        };
        match decode_value(&field.kind, token.value) {
            Some(value) => {
                parsed.malformed.remove(token.name);
                parsed.filters.set(token.name, value);
            }
            None => {
                parsed.malformed.insert(token.name.to_string());
            }
        }
    }
    parsed
}

/// Writes `"{id}:{value} "` per filter, in state order. Every token is
/// followed by a space, including the last one.
pub fn serialize(state: &ColumnFiltersState, fields: &FilterFieldSet) -> String {
    let mut out = String::new();
    for filter in state.iter() {
        let Some(field) = fields.command_field(&filter.id) else {
            continue;
        };
        if let Some(encoded) = encode_value(&field.kind, &filter.value) {
            out.push_str(&filter.id);
            out.push(':');
            out.push_str(&encoded);
            out.push(' ');
        }
    }
    out
}
