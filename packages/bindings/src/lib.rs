use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use reit_calc_core::reit::{RegulationTable, StandardRegulations};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// REIT / FIBRA
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate(input_json: String) -> NapiResult<String> {
    let input: reit_calc_core::reit::InvestmentInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = reit_calc_core::reit::calculate(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn regulations() -> NapiResult<String> {
    let table = StandardRegulations::default();
    serde_json::to_string(&table.all()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Development
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_project_cost(input_json: String) -> NapiResult<String> {
    let input: reit_calc_core::reit::InvestmentInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = reit_calc_core::development::analyze_project_cost(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Market
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct CapRateQuery {
    #[serde(default = "default_country")]
    country: String,
    property_type: String,
    #[serde(default = "default_market_type")]
    market_type: String,
    #[serde(default = "default_property_class")]
    property_class: String,
}

fn default_country() -> String {
    "us".into()
}

fn default_market_type() -> String {
    "prime".into()
}

fn default_property_class() -> String {
    "B".into()
}

#[napi]
pub fn recommended_cap_rate(input_json: String) -> NapiResult<String> {
    let q: CapRateQuery = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let rate = reit_calc_core::market::recommended_cap_rate(
        &q.country,
        &q.property_type,
        &q.market_type,
        &q.property_class,
    );
    serde_json::to_string(&serde_json::json!({ "recommended_cap_rate": rate }))
        .map_err(to_napi_error)
}

#[napi]
pub fn hospitality_metrics(input_json: String) -> NapiResult<String> {
    let input: reit_calc_core::market::HospitalityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        reit_calc_core::market::hospitality_metrics(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
