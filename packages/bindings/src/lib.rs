use napi::Result as NapiResult;
use napi_derive::napi;

use property_yield_core::analysis::AnalysisInput;
use property_yield_core::sanitize::RawInputs;
use property_yield_core::scenarios::presets::{preset_or_default, DEFAULT_INPUTS, PRESETS};
use property_yield_core::scenarios::sensitivity::SensitivityInput;
use property_yield_core::{InputParameters, InterestTarget, RentTarget};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_inputs(input_json: &str) -> NapiResult<InputParameters> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

fn rent_target(name: &str) -> NapiResult<RentTarget> {
    RentTarget::ALL
        .into_iter()
        .find(|t| t.as_str() == name)
        .ok_or_else(|| to_napi_error(format!("Unknown rent target '{}'", name)))
}

fn interest_target(name: &str) -> NapiResult<InterestTarget> {
    InterestTarget::ALL
        .into_iter()
        .find(|t| t.as_str() == name)
        .ok_or_else(|| to_napi_error(format!("Unknown interest target '{}'", name)))
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

#[napi]
pub fn evaluate(input_json: String) -> NapiResult<String> {
    let input = parse_inputs(&input_json)?;
    let output = property_yield_core::evaluate(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Minimum cold rent as a decimal string, or `null` when unreachable.
#[napi]
pub fn breakeven_rent_monthly(input_json: String, target: String) -> NapiResult<Option<String>> {
    let input = parse_inputs(&input_json)?;
    let target = rent_target(&target)?;
    Ok(property_yield_core::breakeven_rent_monthly(&input, target).map(|r| r.to_string()))
}

/// Maximum interest rate in percent as a decimal string, or `null` when
/// the target fails even at 0%.
#[napi]
pub fn breakeven_interest_pct(input_json: String, target: String) -> NapiResult<Option<String>> {
    let input = parse_inputs(&input_json)?;
    let target = interest_target(&target)?;
    Ok(property_yield_core::breakeven_interest_pct(&input, target).map(|r| r.to_string()))
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_property(input_json: String) -> NapiResult<String> {
    let input: AnalysisInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = property_yield_core::analysis::analyze_property(&input);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_properties(a_json: String, b_json: String) -> NapiResult<String> {
    let a = parse_inputs(&a_json)?;
    let b = parse_inputs(&b_json)?;
    let output = property_yield_core::scenarios::compare_properties(&a, &b);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn sensitivity_grid(input_json: String) -> NapiResult<String> {
    let input: SensitivityInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        property_yield_core::scenarios::run_sensitivity(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Form state
// ---------------------------------------------------------------------------

/// Coerce persisted or in-progress form numbers into engine inputs. Missing
/// or `null` fields fall back to the named preset (the first preset for an
/// unknown id) or to the default flat when no preset is given.
#[napi]
pub fn sanitize_inputs(raw_json: String, fallback_preset: Option<String>) -> NapiResult<String> {
    let raw: RawInputs = serde_json::from_str(&raw_json).map_err(to_napi_error)?;
    let fallback = match fallback_preset {
        Some(id) => preset_or_default(&id).inputs,
        None => DEFAULT_INPUTS,
    };
    let output = property_yield_core::sanitize::sanitize(&raw, &fallback);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn list_presets() -> NapiResult<String> {
    serde_json::to_string(&PRESETS).map_err(to_napi_error)
}
