use dioxus::prelude::*;
use explorer_common::column_filters::ColumnFilterValue;
use explorer_common::filter_field::FilterField;
use explorer_common::search_const::INPUT_DEBOUNCE_MS;

use crate::components::data_table::provider::DataTableContext;
use crate::components::data_table::use_debounce::use_debounced_commit;

/// Free text filter; an empty commit removes the filter.
#[component]
pub fn DataTableFilterInput(field: ReadSignal<FilterField>) -> Element {
    let ctx = use_context::<DataTableContext>();
    let committed = use_memo(move || match ctx.state.read().column_filters.get(&field.read().value) {
        Some(ColumnFilterValue::Text(text)) => text.clone(),
        _ => String::new(),
    });
    // None until the user types
    let mut buffer = use_signal(|| None::<String>);
    let debounced = use_debounced_commit(INPUT_DEBOUNCE_MS, move |text: String| {
        let value = if text.is_empty() { None } else { Some(ColumnFilterValue::Text(text)) };
        ctx.set_filter(&field.read().value, value);
    });
    // a commit from elsewhere (reset, palette, url) wins over pending typing
    use_effect(move || {
        let _ = committed.read();
        debounced.cancel();
        buffer.set(None);
    });
    let shown = use_memo(move || buffer.read().clone().unwrap_or_else(|| committed()));

    rsx! {
        input {
            r#type: "text",
            placeholder: "{field.read().label}",
            style: "width: 100%; border: 1px solid rgba(101, 101, 101, 0.5); border-radius: 6px; padding: 4px 8px; font-size: 13px;",
            value: "{shown}",
            oninput: move |e: Event<FormData>| {
                let value = e.value();
                buffer.set(Some(value.clone()));
                debounced.schedule(value);
            },
        }
    }
}
