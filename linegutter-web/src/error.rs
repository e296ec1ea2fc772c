use linegutter_core::GutterError;
use wasm_bindgen::JsValue;

/// Wrap a thrown JS value.
pub fn js_error(value: JsValue) -> GutterError {
    GutterError::Platform(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}

/// Surface a core error to JS callers as a string.
pub fn to_js(err: GutterError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
