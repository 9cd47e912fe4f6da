//! Error boundaries for rendering and server function failures.

use dioxus::prelude::*;

use crate::routes::Route;

/// Outermost boundary; offers a way back to the unfiltered table.
#[component]
pub fn GlobalErrorBoundary(boundary_name: ReadSignal<String>, children: Element) -> Element {
    rsx! {
        ErrorBoundary {
            handle_error: move |err: ErrorContext| {
                rsx! {
                    div {
                        style: "margin: 15px; padding: 10px; border: 1px solid red; border-radius: 5px;",
                        h1 { style: "color: red; font-size: 34px; margin: 0 0 10px 0;", "Error" }
                        p { style: "color: darkred; font-size: 18px;", "Boundary: {boundary_name}" }
                        a {
                            href: Route::logs_page(Default::default()).to_string(),
                            style: "color: blue; font-size: 18px;",
                            "Clear all filters"
                        }
                        pre {
                            style: "color: black; text-wrap: auto; max-height: 60vh; overflow-y: auto;",
                            "{err:#?}"
                        }
                    }
                }
            },
            children
        }
    }
}

#[component]
pub fn ComponentErrorBoundary(children: Element) -> Element {
    rsx! {
        ErrorBoundary {
            handle_error: |err: ErrorContext| {
                let error_txt = match err.error() {
                    Some(e) => format!("{:#?}", e.0),
                    None => "Unknown error".to_string(),
                };
                rsx! {
                    ComponentErrorDisplay {
                        error_txt,
                        button {
                            style: "color: blue; font-size: 16px; border: 1px solid blue; padding: 6px 12px; border-radius: 5px; margin: 10px; background: white; cursor: pointer;",
                            onclick: move |_| err.clear_errors(),
                            "Try Again"
                        }
                    }
                }
            },
            div {
                width: "100%",
                height: "100%",
                {children}
            }
        }
    }
}

#[component]
pub fn ComponentErrorDisplay(error_txt: ReadSignal<String>, children: Element) -> Element {
    rsx! {
        div {
            width: "100%",
            display: "flex",
            flex_direction: "column",
            align_items: "center",
            justify_content: "center",
            padding: "10px",

            h2 {
                style: "color: red; font-size: 20px; margin: 5px;",
                "Could not load",
            }
            pre {
                style: "color: darkred; border: 1px solid red; padding: 10px; border-radius: 5px; margin: 5px; text-wrap: auto; max-width: 600px; max-height: 300px; overflow-y: auto; font-size: 12px;",
                "{error_txt}"
            }
            {children}
        }
    }
}
