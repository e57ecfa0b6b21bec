//! WebAssembly module for the Beereign console
//!
//! Provides the client-side computations a browser front end needs:
//! - Page arithmetic and pagination affordances
//! - Scanner key handling and code normalization
//! - Form validation (first invalid field)
//! - Table cell formatting

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&JsValue::from_str("beereign console wasm loaded"));
}

fn js_error(message: String) -> JsValue {
    web_sys::console::warn_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}

fn language(code: &str) -> Language {
    match code {
        "en" => Language::English,
        _ => Language::Spanish,
    }
}

/// `ceil(count / limit)`; zero rows means zero pages
#[wasm_bindgen]
pub fn total_pages(count: u32, limit: u32) -> u32 {
    shared::total_pages(u64::from(count), limit)
}

fn page_controls_json(page: u32, limit: u32, count: u32, loading: bool) -> Result<String, String> {
    let controls = shared::Pagination::new(page, limit, u64::from(count), loading).controls();
    serde_json::to_string(&controls).map_err(|e| e.to_string())
}

/// Pagination affordances as JSON: previous, next, buttons, disabled
#[wasm_bindgen]
pub fn page_controls(page: u32, limit: u32, count: u32, loading: bool) -> Result<String, JsValue> {
    page_controls_json(page, limit, count, loading).map_err(js_error)
}

/// Whether a key press in the scan field should run a lookup
#[wasm_bindgen]
pub fn is_scan_submit(key_code: u32, value: &str) -> bool {
    shared::is_scan_submit(key_code, value)
}

/// Canonical form of a scanned code: raw-material codes are lowercase
#[wasm_bindgen]
pub fn normalize_scan_code(kind: &str, code: &str) -> String {
    match kind.parse::<EntityKind>() {
        Ok(kind) => shared::normalize_scan_code(kind, code),
        Err(_) => code.trim().to_string(),
    }
}

fn first_error<F>(json: &str) -> Result<Option<FieldError>, String>
where
    F: FormSchema + DeserializeOwned,
{
    let input: F = serde_json::from_str(json).map_err(|e| format!("Invalid form JSON: {}", e))?;
    Ok(input.normalized().check().err())
}

fn validate_form_json(kind: &str, json: &str) -> Result<String, String> {
    let error = match kind {
        "warehouse" | "apiary" => first_error::<SiteInput>(json)?,
        "employee" => first_error::<EmployeeInput>(json)?,
        "type_of_employee" => first_error::<TypeOfEmployeeInput>(json)?,
        "raw_material_batch" => first_error::<RawMaterialBatchInput>(json)?,
        "product_batch" => first_error::<ProductBatchInput>(json)?,
        "batch_update" => first_error::<BatchUpdateInput>(json)?,
        other => return Err(format!("Unknown form: {}", other)),
    };
    match error {
        Some(error) => serde_json::to_string(&serde_json::json!({
            "field": error.field,
            "code": error.code,
            "message": error.message,
        }))
        .map_err(|e| e.to_string()),
        None => Ok(String::new()),
    }
}

/// Validate a form. Returns the first failure as JSON, or an empty string.
#[wasm_bindgen]
pub fn validate_form(kind: &str, json: &str) -> Result<String, JsValue> {
    validate_form_json(kind, json).map_err(js_error)
}

/// Money cell, e.g. `"$12.50"`
#[wasm_bindgen]
pub fn format_currency(amount: &str) -> Result<String, JsValue> {
    Decimal::from_str(amount.trim())
        .map(shared::format_currency)
        .map_err(|e| js_error(format!("Invalid amount: {}", e)))
}

/// Names are stored lowercase; show every word capitalized
#[wasm_bindgen]
pub fn capitalize_name(value: &str) -> String {
    shared::capitalize(value)
}

#[wasm_bindgen]
pub fn no_records_message(language_code: &str) -> String {
    shared::no_records_message(language(language_code)).to_string()
}

#[wasm_bindgen]
pub fn scanner_placeholder(language_code: &str) -> String {
    shared::scanner_placeholder(language(language_code)).to_string()
}

fn batch_violations_json(json: &str) -> Result<Vec<String>, String> {
    let lot: BatchLot = serde_json::from_str(json).map_err(|e| format!("Invalid batch JSON: {}", e))?;
    Ok(lot.violations().iter().map(ToString::to_string).collect())
}

/// Invariants a batch snapshot breaks, as an array of messages
#[wasm_bindgen]
pub fn batch_violations(json: &str) -> Result<js_sys::Array, JsValue> {
    let violations = batch_violations_json(json).map_err(js_error)?;
    Ok(violations.into_iter().map(JsValue::from).collect())
}
