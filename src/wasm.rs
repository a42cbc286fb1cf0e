//! Browser binding
//!
//! On module start `walk` is installed on the JS global object, so pages call
//! it directly: `const r = walk(10, 5, 200, 200); if (r.error) ...`.
//! The returned object mirrors [`WalkResponse`]: `{success: true, image}` or
//! `{error}`.

use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::prelude::*;

use crate::host::{self, WalkResponse};
use crate::WalkConfig;

// Collects a variadic JS call into one array so arity can be checked in Rust.
const VARIADIC_ADAPTER: &str =
    "return function () { return handler(Array.prototype.slice.call(arguments)); };";

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    install()
}

/// Set `globalThis.walk`. The binding lives as long as the module.
pub fn install() -> Result<(), JsValue> {
    let handler = Closure::<dyn Fn(Array) -> JsValue>::new(|args: Array| walk_js(&args));
    let adapter = Function::new_with_args("handler", VARIADIC_ADAPTER);
    let walk = adapter.call1(&JsValue::NULL, handler.as_ref())?;
    Reflect::set(&js_sys::global(), &JsValue::from_str(host::WALK), &walk)?;
    // the global keeps calling into this closure for the page's lifetime
    handler.forget();
    Ok(())
}

fn walk_js(args: &Array) -> JsValue {
    let numbers: Vec<Option<f64>> = args.iter().map(|v| v.as_f64()).collect();
    let response = host::walk_numbers(&numbers, &WalkConfig::default());
    response_to_js(&response).unwrap_or_else(|e| e)
}

fn response_to_js(response: &WalkResponse) -> Result<JsValue, JsValue> {
    let obj = Object::new();
    match response {
        WalkResponse::Success { success, image } => {
            Reflect::set(&obj, &"success".into(), &JsValue::from_bool(*success))?;
            Reflect::set(&obj, &"image".into(), &JsValue::from_str(image))?;
        }
        WalkResponse::Failure { error } => {
            Reflect::set(&obj, &"error".into(), &JsValue::from_str(error))?;
        }
    }
    Ok(obj.into())
}
