use linegutter_core::ConfigOverride;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

pub mod canvas;
pub mod dom;
pub mod error;
pub mod logging;
pub mod observers;
pub mod runtime;
pub mod timers;

use error::to_js;
use runtime::with_runtime;

/// Selector used by [`attach_all`] when none is given.
pub const DEFAULT_SELECTOR: &str = "textarea[data-gutter]";

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    logging::init();
}

/// Show line numbers on `element`
///
/// # Arguments
/// * `element` - the text input to decorate
/// * `options` - optional `{ width, padding, color, background }` object;
///   each key beats the matching `data-gutter-*` attribute
#[wasm_bindgen]
pub fn attach(element: HtmlElement, options: JsValue) -> Result<(), JsValue> {
    let overrides = overrides_from_js(&options);
    with_runtime(|runtime| runtime.attach(element, overrides).map(|_| ())).map_err(to_js)
}

/// Remove `element` from management. Its last gutter stays painted.
#[wasm_bindgen]
pub fn detach(element: HtmlElement) -> Result<(), JsValue> {
    with_runtime(|runtime| runtime.detach(&element)).map_err(to_js)
}

/// Attach every element matching `selector` (default `textarea[data-gutter]`)
/// that is not attached yet. Returns how many were attached.
#[wasm_bindgen(js_name = attachAll)]
pub fn attach_all(selector: Option<String>) -> Result<u32, JsValue> {
    let selector = selector.unwrap_or_else(|| DEFAULT_SELECTOR.to_string());
    with_runtime(|runtime| runtime.attach_all(&selector)).map_err(to_js)
}

/// Stop observing everything. Later attaches fail.
#[wasm_bindgen]
pub fn shutdown() -> Result<(), JsValue> {
    with_runtime(|runtime| {
        runtime.shutdown();
        Ok(())
    })
    .map_err(to_js)
}

/// Completed renders for `element`, or `None` when it is not attached.
pub fn render_count(element: &HtmlElement) -> Option<u64> {
    with_runtime(|runtime| Ok(runtime.render_count(element)))
        .ok()
        .flatten()
}

/// Read `{ width, padding, color, background }` off a plain object. Missing
/// or non-string values are ignored.
pub fn overrides_from_js(options: &JsValue) -> ConfigOverride {
    if !options.is_object() {
        return ConfigOverride::default();
    }
    let get = |key: &str| {
        js_sys::Reflect::get(options, &JsValue::from_str(key))
            .ok()
            .and_then(|value| value.as_string())
    };

    ConfigOverride {
        width: get("width"),
        padding: get("padding"),
        color: get("color"),
        background: get("background"),
    }
}
