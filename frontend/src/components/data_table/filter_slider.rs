//! Numeric range filter with a local two-value buffer.

use dioxus::prelude::*;
use explorer_common::column_filters::{ColumnFilterValue, NumberRange};
use explorer_common::filter_field::FilterField;
use explorer_common::search_const::SLIDER_DEBOUNCE_MS;
use explorer_common::slider::{commit_from_inputs, slider_bounds};

use crate::components::data_table::provider::DataTableContext;
use crate::components::data_table::use_debounce::use_debounced_commit;

fn range_text(range: NumberRange) -> (String, String) {
    (range.min.to_string(), range.max.to_string())
}

#[component]
pub fn DataTableFilterSlider(field: ReadSignal<FilterField>) -> Element {
    let ctx = use_context::<DataTableContext>();
    let bounds = use_memo(move || slider_bounds(&field.read(), &ctx.facets.read()));
    let committed = use_memo(move || match ctx.state.read().column_filters.get(&field.read().value) {
        Some(ColumnFilterValue::Range(range)) => Some(*range),
        _ => None,
    });

    let mut inputs = use_signal(|| (String::new(), String::new()));
    // commits from elsewhere (palette, URL, reset) replace what is typed
    use_effect(move || {
        let text = match (committed(), bounds()) {
            (Some(range), _) | (None, Some(range)) => range_text(range),
            (None, None) => Default::default(),
        };
        inputs.set(text);
    });

    let debounced = use_debounced_commit(SLIDER_DEBOUNCE_MS, move |(min, max): (String, String)| {
        let Some(bounds) = bounds() else { return };
        if let Some(range) = commit_from_inputs(&min, &max, bounds) {
            ctx.set_filter(&field.read().value, Some(ColumnFilterValue::Range(range)));
        }
    });
    let mut set_min = move |value: String| {
        inputs.write().0 = value;
        debounced.schedule(inputs.peek().clone());
    };
    let mut set_max = move |value: String| {
        inputs.write().1 = value;
        debounced.schedule(inputs.peek().clone());
    };

    let (lo, hi) = bounds().map(|b| (b.min, b.max)).unwrap_or((0.0, 0.0));
    let input_style = "width: 45%; border: 1px solid rgba(101, 101, 101, 0.5); border-radius: 6px; padding: 4px 8px; font-size: 13px;";

    rsx! {
        div {
            style: "display: flex; flex-direction: row; justify-content: space-between; gap: 6px;",
            input {
                r#type: "number",
                class: "x-mono",
                style: input_style,
                min: "{lo}",
                max: "{hi}",
                value: "{inputs.read().0}",
                oninput: move |e: Event<FormData>| set_min(e.value()),
            }
            input {
                r#type: "number",
                class: "x-mono",
                style: input_style,
                min: "{lo}",
                max: "{hi}",
                value: "{inputs.read().1}",
                oninput: move |e: Event<FormData>| set_max(e.value()),
            }
        }
        div {
            style: "display: flex; flex-direction: column; gap: 2px; margin-top: 6px;",
            input {
                r#type: "range",
                min: "{lo}",
                max: "{hi}",
                value: "{inputs.read().0}",
                oninput: move |e: Event<FormData>| set_min(e.value()),
            }
            input {
                r#type: "range",
                min: "{lo}",
                max: "{hi}",
                value: "{inputs.read().1}",
                oninput: move |e: Event<FormData>| set_max(e.value()),
            }
        }
    }
}
