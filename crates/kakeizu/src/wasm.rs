//! WebAssembly bindings for Kakeizu
//!
//! JSON in, JSON out. Errors surface as JavaScript exceptions.

use wasm_bindgen::prelude::*;

use crate::core::{Direction, LayoutConfig};
use crate::tree::{label, Tree};

/// Initialize WASM module
///
/// Sets up panic hooks and logging for better error messages in the browser.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    use crate::core::logging::init_logging;
    let _ = init_logging(Some("info"), None);
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Lay out a tree given as `{"people": [...]}`
///
/// # Arguments
/// * `json` - the tree
/// * `direction` - "TB", "BT", "LR" or "RL"
///
/// # Returns
/// * `{"nodes": [...], "edges": [...]}` with absolute positions
#[wasm_bindgen]
pub fn layout_tree(json: &str, direction: &str) -> Result<String, JsValue> {
    let tree = Tree::from_json(json).map_err(js_error)?;
    let direction: Direction = direction.parse().map_err(js_error)?;
    let config = LayoutConfig::new().with_direction(direction);
    let graph = crate::layout_tree_with_config(&tree, &config).map_err(js_error)?;
    graph.to_json().map_err(js_error)
}

/// Generation rows as `[[{"id": ..., "label": ...}, ...], ...]`, ancestors first
#[wasm_bindgen]
pub fn generation_rows(json: &str) -> Result<String, JsValue> {
    let tree = Tree::from_json(json).map_err(js_error)?;
    let rows: Vec<Vec<serde_json::Value>> = crate::rank::generation_rows(&tree)
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|person| serde_json::json!({ "id": person.id, "label": label(person) }))
                .collect()
        })
        .collect();
    serde_json::to_string(&rows).map_err(js_error)
}

/// Problems found in the tree, one message per issue
#[wasm_bindgen]
pub fn check_tree(json: &str) -> Result<String, JsValue> {
    let tree = Tree::from_json(json).map_err(js_error)?;
    let issues: Vec<String> = tree.validate().iter().map(ToString::to_string).collect();
    serde_json::to_string(&issues).map_err(js_error)
}
