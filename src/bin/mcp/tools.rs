//! MCP tool implementations backed by the testforge engine.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info};

use testforge_rs::api::engine::TestforgeEngine;
use testforge_rs::core::errors::TestforgeError;
use testforge_rs::core::signatures::{load_signatures, ClassSignature};
use testforge_rs::detectors::surefire::DEFAULT_REPORTS_DIR;
use testforge_rs::synthesis::orchestration::SpecGenerationRequest;

use crate::mcp::protocol::{error_codes, ToolResult};

type ToolOutcome = Result<ToolResult, (i32, String)>;

/// Where a tool reads class signatures from
#[derive(Debug, Default, Deserialize)]
pub struct SignatureSource {
    #[serde(default)]
    pub signatures_path: Option<String>,
    #[serde(default)]
    pub signatures: Option<Vec<ClassSignature>>,
}

impl SignatureSource {
    fn load(self) -> Result<Vec<ClassSignature>, (i32, String)> {
        match (self.signatures_path, self.signatures) {
            (Some(path), _) => load_signatures(Path::new(&path)).map_err(map_error),
            (None, Some(inline)) => Ok(inline),
            (None, None) => Err((
                error_codes::INVALID_PARAMS,
                "Either signatures_path or signatures is required".to_string(),
            )),
        }
    }
}

/// Parameters for analyze_coverage tool
#[derive(Debug, Deserialize)]
pub struct AnalyzeCoverageParams {
    pub project_root: String,
    #[serde(default)]
    pub min_coverage: Option<f64>,
}

/// Parameters for generate_spec_based_tests tool
#[derive(Debug, Deserialize)]
pub struct GenerateSpecBasedTestsParams {
    pub class_fqn: String,
    pub method: String,
    #[serde(default)]
    pub parameter_types: Option<Vec<String>>,
    /// Hints as a JSON object or as its string encoding
    #[serde(default)]
    pub spec: Option<Value>,
    #[serde(default)]
    pub max_cases: Option<usize>,
    #[serde(flatten)]
    pub source: SignatureSource,
}

/// Strings pass through untouched; any other JSON value is re-encoded so the
/// lenient hint parser can accept or warn about it.
fn spec_text(spec: Option<Value>) -> Option<String> {
    match spec? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

/// Parameters for generate_junit_tests tool
#[derive(Debug, Deserialize)]
pub struct GenerateJunitTestsParams {
    pub project_root: String,
    #[serde(default)]
    pub overwrite: bool,
    #[serde(flatten)]
    pub source: SignatureSource,
}

/// Parameters for summarize_project tool
#[derive(Debug, Deserialize)]
pub struct SummarizeProjectParams {
    #[serde(flatten)]
    pub source: SignatureSource,
}

/// Parameters for parse_test_results tool
#[derive(Debug, Default, Deserialize)]
pub struct ParseTestResultsParams {
    #[serde(default)]
    pub reports_dir: Option<String>,
    #[serde(default)]
    pub project_root: Option<String>,
}

impl ParseTestResultsParams {
    fn reports_dir(&self) -> PathBuf {
        match (&self.reports_dir, &self.project_root) {
            (Some(dir), _) => PathBuf::from(dir),
            (None, Some(root)) => Path::new(root).join(DEFAULT_REPORTS_DIR),
            (None, None) => PathBuf::from(DEFAULT_REPORTS_DIR),
        }
    }
}

/// Map a library error onto a JSON-RPC error code and message.
pub fn map_error(err: TestforgeError) -> (i32, String) {
    let code = match &err {
        TestforgeError::ReportNotFound { .. } => error_codes::REPORT_NOT_FOUND,
        TestforgeError::Resolution { .. } => error_codes::RESOLUTION_ERROR,
        TestforgeError::Validation { .. } | TestforgeError::Config { .. } => {
            error_codes::INVALID_PARAMS
        }
        TestforgeError::Parse { .. } => error_codes::ANALYSIS_ERROR,
        _ => error_codes::INTERNAL_ERROR,
    };
    (code, err.to_string())
}

fn to_tool_result<T: serde::Serialize>(value: &T) -> ToolOutcome {
    ToolResult::json(value).map_err(|e| {
        error!("Failed to format results: {}", e);
        (
            error_codes::INTERNAL_ERROR,
            format!("Failed to format results: {}", e),
        )
    })
}

/// Execute the analyze_coverage tool
pub async fn execute_analyze_coverage(
    engine: &TestforgeEngine,
    params: AnalyzeCoverageParams,
) -> ToolOutcome {
    info!("Executing analyze_coverage tool for {}", params.project_root);
    let result = engine
        .analyze_coverage(Path::new(&params.project_root), params.min_coverage)
        .map_err(map_error)?;
    to_tool_result(&result)
}

/// Execute the generate_spec_based_tests tool
pub async fn execute_generate_spec_based_tests(
    engine: &TestforgeEngine,
    params: GenerateSpecBasedTestsParams,
) -> ToolOutcome {
    info!(
        "Executing generate_spec_based_tests tool for {}#{}",
        params.class_fqn, params.method
    );
    let classes = params.source.load()?;

    let mut request = SpecGenerationRequest::new(params.class_fqn, params.method);
    request.parameter_types = params.parameter_types;
    request.spec = spec_text(params.spec);
    request.max_cases = params.max_cases;

    let result = engine
        .generate_spec_based_tests(&classes, &request)
        .map_err(map_error)?;
    to_tool_result(&result)
}

/// Execute the generate_junit_tests tool
pub async fn execute_generate_junit_tests(
    engine: &TestforgeEngine,
    params: GenerateJunitTestsParams,
) -> ToolOutcome {
    info!("Executing generate_junit_tests tool for {}", params.project_root);
    let classes = params.source.load()?;
    let result = engine
        .generate_junit_tests(
            &classes,
            Path::new(&params.project_root),
            params.overwrite.then_some(true),
        )
        .map_err(map_error)?;
    to_tool_result(&result)
}

/// Execute the summarize_project tool
pub async fn execute_summarize_project(
    engine: &TestforgeEngine,
    params: SummarizeProjectParams,
) -> ToolOutcome {
    let classes = params.source.load()?;
    to_tool_result(&engine.summarize_project(&classes))
}

/// Execute the parse_test_results tool
pub async fn execute_parse_test_results(
    engine: &TestforgeEngine,
    params: ParseTestResultsParams,
) -> ToolOutcome {
    let reports_dir = params.reports_dir();
    info!("Executing parse_test_results tool for {}", reports_dir.display());
    let results = engine.test_results(&reports_dir).map_err(map_error)?;
    to_tool_result(&results)
}
