//! Command palette: the filter state as editable `field:value` text.
//!
//! The input drives the filters whenever the word under the caret is
//! complete (or the palette is closed); filter changes from elsewhere are
//! written back into the input only while the palette is closed.

use chrono::{DateTime, Utc};
use dioxus::prelude::*;
use dioxus_free_icons::{Icon, icons::{md_action_icons::{MdHistory, MdSearch}, md_navigation_icons::MdClose}};
use explorer_common::command::{
    Suggestion, SuggestionKind, apply_suggestion, caret_from_utf16, current_word, should_apply_input, step_selection,
    suggestions, synced_input, utf16_from_caret,
};
use explorer_common::query_string::{parse, serialize};
use explorer_common::recent_searches::{LastSearch, RecentSearches};
use gloo_timers::future::TimeoutFuture;

use crate::components::data_table::filter_timerange::UpgradePrompt;
use crate::components::data_table::provider::DataTableContext;
use crate::data_definitions::browser::{BrowserStorage, caret_position, now_millis, set_caret_position};

const COMMAND_INPUT_ID: &str = "x-data-table-command-input";

#[component]
pub fn DataTableFilterCommand() -> Element {
    let ctx = use_context::<DataTableContext>();
    let mut open = ctx.command_open;
    let mut state = ctx.state;
    let mut input = use_signal(|| serialize(&ctx.state.peek().column_filters, &ctx.fields.peek()));
    // byte offset into `input`
    let mut caret = use_signal(|| 0_usize);
    let mut highlighted = use_signal(|| None::<usize>);
    let mut recent = use_signal(RecentSearches::new);
    let mut recent_entries = use_signal(Vec::<LastSearch>::new);
    // a typed time range older than the plan allows
    let mut upgrade_required = use_signal(|| None::<DateTime<Utc>>);

    let word = use_memo(move || current_word(&input.read(), caret()));
    let suggestion_list = use_memo(move || {
        if !open() {
            return Vec::new();
        }
        suggestions(&ctx.fields.read(), &ctx.facets.read(), &word.read().text, Utc::now())
    });

    use_effect(move || {
        if open() {
            recent_entries.set(recent.write().visible(&BrowserStorage));
        }
    });

    // filters changed elsewhere: follow them while the palette is closed
    use_effect(move || {
        let serialized = serialize(&ctx.state.read().column_filters, &ctx.fields.read());
        let current = input.peek().clone();
        if let Some(text) = synced_input(open(), &current, serialized) {
            caret.set(text.len());
            input.set(text);
        }
    });

    let mut apply_input = move || {
        let fields = ctx.fields.peek();
        let mut parsed = parse(&input.peek(), &fields);
        let held_back = ctx.retention.peek().gate_query(&mut parsed, Utc::now());
        upgrade_required.set(held_back);
        state.write().apply_query(&parsed, &fields);
    };
    let mut close = move || {
        apply_input();
        highlighted.set(None);
        open.set(false);
    };
    let mut submit = move || {
        let search = input.peek().clone();
        recent.write().submit(&BrowserStorage, &search, now_millis());
        close();
    };
    let mut accept = move |suggestion: Suggestion| {
        let current = input.peek().clone();
        let span = current_word(&current, caret());
        let edit = apply_suggestion(&current, &span, &suggestion, &ctx.fields.peek());
        let finished = should_apply_input(true, &current_word(&edit.input, edit.caret).text);
        let units = utf16_from_caret(&edit.input, edit.caret);
        input.set(edit.input);
        caret.set(edit.caret);
        highlighted.set(None);
        // after the new value has reached the DOM
        spawn(async move {
            TimeoutFuture::new(0).await;
            set_caret_position(COMMAND_INPUT_ID, units);
        });
        if finished {
            apply_input();
        }
    };
    let mut pick_recent = move |search: String| {
        caret.set(search.len());
        input.set(search);
        submit();
    };
    let mut sync_caret = move || {
        let value = input.peek().clone();
        if let Some(units) = caret_position(COMMAND_INPUT_ID) {
            caret.set(caret_from_utf16(&value, units));
        }
    };

    let on_input = move |e: Event<FormData>| {
        let value = e.value();
        let units = caret_position(COMMAND_INPUT_ID).unwrap_or_else(|| value.encode_utf16().count());
        let byte_caret = caret_from_utf16(&value, units);
        let finished = should_apply_input(true, &current_word(&value, byte_caret).text);
        caret.set(byte_caret);
        input.set(value);
        highlighted.set(None);
        if !open() {
            open.set(true);
        }
        if finished {
            apply_input();
        }
    };
    let on_keydown = move |e: Event<KeyboardData>| {
        let modified = e.modifiers().contains(Modifiers::META) || e.modifiers().contains(Modifiers::CONTROL);
        let len = suggestion_list.read().len();
        match e.key() {
            Key::ArrowDown => {
                e.prevent_default();
                highlighted.set(step_selection(highlighted(), len, 1));
            }
            Key::ArrowUp => {
                e.prevent_default();
                highlighted.set(step_selection(highlighted(), len, -1));
            }
            Key::Enter => {
                e.prevent_default();
                let chosen = highlighted().and_then(|i| suggestion_list.read().get(i).cloned());
                match chosen {
                    Some(suggestion) => accept(suggestion),
                    None => submit(),
                }
            }
            Key::Escape if modified => {
                // reset here so the stale text is not re-applied on blur
                e.prevent_default();
                e.stop_propagation();
                input.set(String::new());
                caret.set(0);
                highlighted.set(None);
                ctx.reset_filters();
            }
            Key::Escape => close(),
            _ => {}
        }
    };

    rsx! {
        div {
            id: "x-data-table-command",
            style: "position: relative; width: 100%;",
            div {
                style: "
                    display: flex;
                    align-items: center;
                    gap: 8px;
                    background-color: white;
                    border-radius: 8px;
                    padding: 6px 10px;
                    border: 1px solid rgba(101, 101, 101, 0.5);
                ",
                Icon { icon: MdSearch, style: "width: 18px; height: 18px; color: #6B7280; flex-shrink: 0;" }
                input {
                    id: COMMAND_INPUT_ID,
                    r#type: "text",
                    class: "x-mono",
                    autocomplete: "off",
                    spellcheck: "false",
                    placeholder: "Search data table...",
                    style: "flex: 1; border: none; outline: none; background: transparent; font-size: 14px;",
                    value: "{input}",
                    oninput: on_input,
                    onkeydown: on_keydown,
                    onkeyup: move |_| sync_caret(),
                    onclick: move |_| sync_caret(),
                    onfocus: move |_| open.set(true),
                    onblur: move |_| {
                        if open() {
                            close();
                        }
                    },
                }
            }
            if let Some(earliest_allowed) = upgrade_required() {
                UpgradePrompt {
                    earliest_allowed,
                    retention_days: ctx.retention.read().log_retention_days.unwrap_or_default(),
                    on_dismiss: move |_| upgrade_required.set(None),
                }
            }
            if open() {
                div {
                    style: "
                        position: absolute;
                        top: calc(100% + 4px);
                        left: 0px;
                        width: 100%;
                        max-height: 360px;
                        overflow-y: auto;
                        background-color: white;
                        border: 1px solid rgba(101, 101, 101, 0.5);
                        border-radius: 8px;
                        box-shadow: 0 0 10px 0 rgba(0, 0, 0, 0.1);
                        z-index: 1000;
                        padding: 4px;
                    ",
                    ul {
                        for (index, suggestion) in suggestion_list().into_iter().enumerate() {
                            SuggestionItem {
                                key: "{suggestion.field}-{suggestion.value}",
                                suggestion: suggestion.clone(),
                                active: highlighted() == Some(index),
                                on_select: move |s: Suggestion| accept(s),
                            }
                        }
                    }
                    if word.read().text.is_empty() && !recent_entries.read().is_empty() {
                        div {
                            style: "display: flex; align-items: center; font-size: 12px; color: rgba(28, 33, 45, 0.6); padding: 6px 6px 2px 6px;",
                            "Recent searches"
                            div { style: "flex-grow: 1;" }
                            button {
                                style: "border: none; background: none; cursor: pointer; font-size: 12px; color: rgba(28, 33, 45, 0.6);",
                                onmousedown: move |e: Event<MouseData>| {
                                    e.prevent_default();
                                    recent.write().clear(&BrowserStorage);
                                    recent_entries.set(Vec::new());
                                },
                                "Clear"
                            }
                        }
                        ul {
                            for entry in recent_entries() {
                                RecentSearchItem {
                                    key: "{entry.search}",
                                    search: entry.search.clone(),
                                    on_select: move |search: String| pick_recent(search),
                                    on_remove: move |search: String| {
                                        recent.write().remove(&BrowserStorage, &search);
                                        recent_entries.set(recent.write().visible(&BrowserStorage));
                                    },
                                }
                            }
                        }
                    }
                    div {
                        style: "font-size: 11px; color: rgba(28, 33, 45, 0.6); padding: 6px; border-top: 1px solid rgba(101, 101, 101, 0.2); margin-top: 4px;",
                        "Arrows to navigate, Enter to select, Esc to close. Union values with ',', ranges with '-'."
                    }
                }
            }
        }
    }
}

#[component]
fn SuggestionItem(suggestion: ReadSignal<Suggestion>, active: bool, on_select: EventHandler<Suggestion>) -> Element {
    let text = use_memo(move || {
        let s = suggestion.read();
        match s.kind {
            SuggestionKind::Field => format!("{}:", s.field),
            SuggestionKind::Value => format!("{}:{}", s.field, s.value),
        }
    });
    let count_txt = use_memo(move || suggestion.read().count.map(|c| c.to_string()).unwrap_or_default());
    let class = if active { "x-suggestion-active" } else { "" };
    rsx! {
        li {
            class: "{class}",
            style: "display: flex; flex-direction: row; align-items: center; gap: 8px; padding: 4px 6px; border-radius: 4px; cursor: pointer; font-size: 13px;",
            onmousedown: move |e: Event<MouseData>| {
                e.prevent_default();
                on_select.call(suggestion.read().clone());
            },
            span { class: "x-mono", "{text}" }
            if suggestion.read().label != suggestion.read().value {
                span { style: "color: rgba(28, 33, 45, 0.6);", "{suggestion.read().label}" }
            }
            div { style: "flex-grow: 1;" }
            span { class: "x-mono", style: "font-size: 12px; color: rgba(28, 33, 45, 0.7);", "{count_txt}" }
        }
    }
}

#[component]
fn RecentSearchItem(search: ReadSignal<String>, on_select: EventHandler<String>, on_remove: EventHandler<String>) -> Element {
    rsx! {
        li {
            class: "x-filter-list-item",
            style: "display: flex; flex-direction: row; align-items: center; gap: 8px; padding: 4px 6px; border-radius: 4px; cursor: pointer; font-size: 13px;",
            onmousedown: move |e: Event<MouseData>| {
                e.prevent_default();
                on_select.call(search.read().clone());
            },
            Icon { icon: MdHistory, style: "width: 16px; height: 16px; color: #6B7280; flex-shrink: 0;" }
            span { class: "x-mono", style: "overflow: hidden; text-overflow: ellipsis; white-space: nowrap;", "{search}" }
            div { style: "flex-grow: 1;" }
            button {
                style: "border: none; background: none; cursor: pointer; padding: 0;",
                title: "Remove",
                onmousedown: move |e: Event<MouseData>| {
                    e.prevent_default();
                    e.stop_propagation();
                    on_remove.call(search.read().clone());
                },
                Icon { icon: MdClose, style: "width: 14px; height: 14px; color: #6B7280;" }
            }
        }
    }
}
