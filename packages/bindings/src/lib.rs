use napi::Result as NapiResult;
use napi_derive::napi;
use serde::de::DeserializeOwned;

use mcx_parity_core::parity::{engine, sheet as parity_sheet};
use mcx_parity_core::quantity::{converter, profiles, sheet as quantity_sheet};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// One-shot calculations
// ---------------------------------------------------------------------------

#[napi]
pub fn derive_quantities(input_json: String) -> NapiResult<String> {
    let input: converter::QuantityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = converter::analyze_quantities(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compute_parity(input_json: String) -> NapiResult<String> {
    let input: engine::ParityInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = engine::analyze_parity(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn list_profiles() -> NapiResult<String> {
    serde_json::to_string(&profiles::list_profiles()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Sheet reducers: the host keeps the state, we apply one event at a time
// ---------------------------------------------------------------------------

/// Empty string means a fresh sheet.
fn sheet_or_default<T: Default + DeserializeOwned>(state_json: &str) -> NapiResult<T> {
    if state_json.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(state_json).map_err(to_napi_error)
}

#[napi]
pub fn apply_quantity_event(state_json: String, event_json: String) -> NapiResult<String> {
    let sheet: quantity_sheet::QuantitySheet = sheet_or_default(&state_json)?;
    let event: quantity_sheet::QuantityEvent =
        serde_json::from_str(&event_json).map_err(to_napi_error)?;
    let output = quantity_sheet::replay_quantity(sheet, std::slice::from_ref(&event));
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn apply_parity_event(state_json: String, event_json: String) -> NapiResult<String> {
    let sheet: parity_sheet::ParitySheet = sheet_or_default(&state_json)?;
    let event: parity_sheet::ParityEvent =
        serde_json::from_str(&event_json).map_err(to_napi_error)?;
    let output = parity_sheet::replay_parity(sheet, std::slice::from_ref(&event));
    serde_json::to_string(&output).map_err(to_napi_error)
}
