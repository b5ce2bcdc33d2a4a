//! WebAssembly bindings.
//!
//! Subjects, rules and results cross the boundary as plain JS objects in
//! the same camelCase shape the JSON rule documents use.

use wasm_bindgen::prelude::*;

use crate::allocation;
use crate::compare::{Comparison, NamedRule};
use crate::rule::Rule;
use crate::subject::Subject;

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsError::new(&e.to_string()))
}

/// Allocates `subjects` (array of `{ name, grade, credits }`) under `rule`.
#[wasm_bindgen]
pub fn allocate(subjects: JsValue, rule: JsValue) -> Result<JsValue, JsError> {
    let subjects: Vec<Subject> = serde_wasm_bindgen::from_value(subjects)?;
    let rule: Rule = serde_wasm_bindgen::from_value(rule)?;
    to_js(&allocation::allocate(&subjects, &rule))
}

/// Ranks a catalog (array of `{ name, rule }`) against `subjects`.
#[wasm_bindgen]
pub fn compare(subjects: JsValue, catalog: JsValue) -> Result<JsValue, JsError> {
    let subjects: Vec<Subject> = serde_wasm_bindgen::from_value(subjects)?;
    let catalog: Vec<NamedRule> = serde_wasm_bindgen::from_value(catalog)?;
    to_js(&Comparison::new(catalog).rank(&subjects))
}
