//! The log explorer page. The URL query string is the table state.

use dioxus::logger::tracing::warn;
use dioxus::core::Task;
use dioxus::prelude::*;
use explorer_common::entitlement::RetentionPolicy;
use explorer_common::filter_field::FilterFieldSet;
use explorer_common::logs::{LogsPage as LogsPageData, log_filter_fields};
use explorer_common::search_const::{LIVE_REFRESH_MS, MAX_LOADED_ROWS, PAGE_SIZE};
use explorer_common::search_params::{RawSearchParams, UUID_PARAM, decode_search_params, encode_search_params};
use gloo_timers::future::TimeoutFuture;

use crate::api::logs_api::{fetch_logs, plan_entitlement};
use crate::components::data_table::DataTable;
use crate::components::error_boundary::ComponentErrorDisplay;
use crate::routes::Route;

#[component]
pub fn LogsPage(search: RawSearchParams) -> Element {
    let fields = match log_filter_fields() {
        Ok(fields) => fields,
        Err(e) => return rsx! { ComponentErrorDisplay { error_txt: e.to_string() } },
    };

    rsx! {
        Title { "Logs Explorer" }
        LogsPageRootComponent { search, fields }
    }
}

#[component]
fn LogsPageRootComponent(search: ReadSignal<RawSearchParams>, fields: ReadSignal<FilterFieldSet>) -> Element {
    let mut state = use_signal(|| decode_search_params(&search.peek(), &fields.peek()));
    let command_open = use_signal(|| false);

    // url changed (navigation, back button): adopt it; column visibility is not in the url
    use_effect(move || {
        let mut decoded = decode_search_params(&search.read(), &fields.read());
        decoded.column_visibility = state.peek().column_visibility.clone();
        if *state.peek() != decoded {
            state.set(decoded);
        }
    });

    // state changed: replace the url, held back while the command palette is being edited
    use_effect(move || {
        let encoded = encode_search_params(&state.read(), &fields.read());
        if command_open() {
            return;
        }
        if encoded != *search.peek() {
            navigator().replace(Route::logs_page(encoded));
        }
    });

    // selecting a row does not reload
    let fetch_search = use_memo(move || {
        RawSearchParams(search.read().0.iter().filter(|(key, _)| key != UUID_PARAM).cloned().collect())
    });

    let mut limit = use_signal(|| PAGE_SIZE);
    use_effect(move || {
        let _ = fetch_search.read();
        if *limit.peek() != PAGE_SIZE {
            limit.set(PAGE_SIZE);
        }
    });

    let mut logs = use_resource(move || {
        let search = fetch_search.read().clone();
        fetch_logs(search, limit())
    });

    // last good page stays on screen while the next one loads
    let mut page = use_signal(LogsPageData::default);
    let mut load_error = use_signal(|| None::<String>);
    use_effect(move || match &*logs.read() {
        Some(Ok(loaded)) => {
            page.set(loaded.clone());
            load_error.set(None);
        }
        Some(Err(e)) => load_error.set(Some(format!("{:#?}", e))),
        None => {}
    });
    let is_loading = use_memo(move || matches!(*logs.state().read(), UseResourceState::Pending));

    let live = use_memo(move || state.read().live);
    let mut poll_task = use_signal(|| None::<Task>);
    use_effect(move || {
        let live = live();
        if let Some(task) = poll_task.write().take() {
            task.cancel();
        }
        if live {
            let task = spawn(async move {
                loop {
                    TimeoutFuture::new(LIVE_REFRESH_MS).await;
                    logs.restart();
                }
            });
            poll_task.set(Some(task));
        }
    });

    let entitlement = use_resource(plan_entitlement);
    let retention = use_memo(move || match &*entitlement.read() {
        Some(Ok(policy)) => *policy,
        Some(Err(e)) => {
            warn!("plan entitlement unavailable, not limiting time ranges: {e}");
            RetentionPolicy::default()
        }
        None => RetentionPolicy::default(),
    });

    rsx! {
        div {
            id: "x-logs-page-root-component",
            style: r#"
                height: 100vh;
                width: 100%;
                display: flex;
                flex-direction: column;
            "#,
            if let Some(error_txt) = load_error() {
                ComponentErrorDisplay {
                    error_txt,
                    button {
                        style: "color: blue; font-size: 16px; border: 1px solid blue; padding: 6px 12px; border-radius: 5px; margin: 10px; background: white; cursor: pointer;",
                        onclick: move |_| logs.restart(),
                        "Try Again"
                    }
                }
            }
            div {
                style: "flex-grow: 1; min-height: 0;",
                DataTable {
                    fields,
                    state,
                    page,
                    is_loading,
                    retention,
                    search,
                    command_open,
                    on_load_more: move |_| {
                        let next = (limit() + PAGE_SIZE).min(MAX_LOADED_ROWS);
                        if next != limit() {
                            limit.set(next);
                        }
                    },
                }
            }
        }
    }
}
