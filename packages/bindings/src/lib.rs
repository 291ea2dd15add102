use chrono::NaiveDate;
use napi::bindgen_prelude::Buffer;
use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use microloan_core::{
    ArtifactExporter, ContractRequest, DocumentConfig, ExportFormat, LoanParameters,
};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Contract fields plus an optional document configuration.
#[derive(Deserialize)]
struct ContractInput {
    #[serde(flatten)]
    request: ContractRequest,
    #[serde(default)]
    config: DocumentConfig,
}

/// Loan parameters, the generation date and an optional configuration.
#[derive(Deserialize)]
struct ScheduleInput {
    #[serde(flatten)]
    parameters: LoanParameters,
    issued_on: NaiveDate,
    #[serde(default)]
    config: DocumentConfig,
}

fn parse<T: for<'de> Deserialize<'de>>(input_json: &str) -> NapiResult<T> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

fn text(bytes: Vec<u8>) -> NapiResult<String> {
    String::from_utf8(bytes).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_totals(input_json: String) -> NapiResult<String> {
    let p: LoanParameters = parse(&input_json)?;
    let output = microloan_core::compute_totals(p.principal, p.term_days, p.daily_rate)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compute_schedule(input_json: String) -> NapiResult<String> {
    let p: LoanParameters = parse(&input_json)?;
    let output = microloan_core::compute_schedule(p.principal, p.term_days, p.daily_rate)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analyze_loan(input_json: String) -> NapiResult<String> {
    let params: LoanParameters = parse(&input_json)?;
    let output = microloan_core::analyze_loan(&params).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

#[napi]
pub fn render_schedule_text(input_json: String) -> NapiResult<String> {
    let input: ScheduleInput = parse(&input_json)?;
    let exporter = ArtifactExporter::new(input.config).map_err(to_napi_error)?;
    let artifact = exporter
        .build_schedule(&input.parameters, input.issued_on, ExportFormat::Text)
        .map_err(to_napi_error)?;
    text(artifact.bytes)
}

#[napi]
pub fn render_contract_text(input_json: String) -> NapiResult<String> {
    let input: ContractInput = parse(&input_json)?;
    let exporter = ArtifactExporter::new(input.config).map_err(to_napi_error)?;
    let artifact = exporter
        .build_contract(&input.request, ExportFormat::Text)
        .map_err(to_napi_error)?;
    text(artifact.bytes)
}

#[napi]
pub fn build_contract_pdf(input_json: String) -> NapiResult<Buffer> {
    let input: ContractInput = parse(&input_json)?;
    let exporter = ArtifactExporter::new(input.config).map_err(to_napi_error)?;
    let artifact = exporter
        .build_contract(&input.request, ExportFormat::Pdf)
        .map_err(to_napi_error)?;
    Ok(artifact.bytes.into())
}

#[napi]
pub fn build_schedule_pdf(input_json: String) -> NapiResult<Buffer> {
    let input: ScheduleInput = parse(&input_json)?;
    let exporter = ArtifactExporter::new(input.config).map_err(to_napi_error)?;
    let artifact = exporter
        .build_schedule(&input.parameters, input.issued_on, ExportFormat::Pdf)
        .map_err(to_napi_error)?;
    Ok(artifact.bytes.into())
}
