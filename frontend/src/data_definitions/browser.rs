//! Browser bindings: `localStorage`, caret position and focus.
//! Outside the browser (server render) storage is empty and writes are dropped.

use explorer_common::storage::KeyValueStore;

/// `window.localStorage` behind the storage port.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

impl KeyValueStore for BrowserStorage {
    #[cfg(target_arch = "wasm32")]
    fn get(&self, key: &str) -> Option<String> {
        local_storage()?.get_item(key).ok()?
    }

    #[cfg(target_arch = "wasm32")]
    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = local_storage() {
            if let Err(e) = storage.set_item(key, value) {
                dioxus::logger::tracing::warn!("localStorage write failed for {key}: {e:?}");
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn remove(&self, key: &str) {
        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(key);
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn set(&self, _key: &str, _value: &str) {}

    #[cfg(not(target_arch = "wasm32"))]
    fn remove(&self, _key: &str) {}
}

#[cfg(target_arch = "wasm32")]
fn input_element(id: &str) -> Option<web_sys::HtmlInputElement> {
    use wasm_bindgen::JsCast;
    web_sys::window()?.document()?.get_element_by_id(id)?.dyn_into::<web_sys::HtmlInputElement>().ok()
}

/// Caret of the input with `id`, in UTF-16 code units.
#[cfg(target_arch = "wasm32")]
pub fn caret_position(id: &str) -> Option<usize> {
    let start = input_element(id)?.selection_start().ok()??;
    Some(start as usize)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn caret_position(_id: &str) -> Option<usize> {
    None
}

#[cfg(target_arch = "wasm32")]
pub fn set_caret_position(id: &str, units: usize) {
    if let Some(input) = input_element(id) {
        let units = units as u32;
        let _ = input.set_selection_range(units, units);
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn set_caret_position(_id: &str, _units: usize) {}

/// Whether keyboard focus is in a text field, where single-key shortcuts are ignored.
#[cfg(target_arch = "wasm32")]
pub fn is_typing() -> bool {
    let active = web_sys::window().and_then(|w| w.document()).and_then(|d| d.active_element());
    matches!(active.map(|e| e.tag_name()).as_deref(), Some("INPUT" | "TEXTAREA" | "SELECT"))
}

#[cfg(not(target_arch = "wasm32"))]
pub fn is_typing() -> bool {
    false
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
