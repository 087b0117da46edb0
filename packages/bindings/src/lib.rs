use napi::Result as NapiResult;
use napi_derive::napi;

use biz_analytics_core::kpi::record::{FinancialInputs, FinancialRecord};
use biz_analytics_core::report;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// KPI calculator
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_kpi(input_json: String) -> NapiResult<String> {
    let input: FinancialInputs = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = biz_analytics_core::kpi::calculate_kpi(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Reporting
// ---------------------------------------------------------------------------

#[derive(serde::Deserialize)]
struct ReportBindingInput {
    records: Vec<FinancialRecord>,
    #[serde(default)]
    period: report::Period,
}

#[napi]
pub fn analysis_report(input_json: String) -> NapiResult<String> {
    let binding_input: ReportBindingInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = report::build_analysis_report(&binding_input.records, binding_input.period)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn dashboard_summary(input_json: String) -> NapiResult<String> {
    let records: Vec<FinancialRecord> =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = report::dashboard_summary(&records);
    serde_json::to_string(&output).map_err(to_napi_error)
}
