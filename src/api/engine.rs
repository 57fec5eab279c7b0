//! Engine facade used by the CLI and the MCP server.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::core::config::TestforgeConfig;
use crate::core::coverage_discovery::CoverageDiscovery;
use crate::core::errors::{Result, TestforgeError};
use crate::core::signatures::{summarize, ClassSignature, ProjectSummary};
use crate::detectors::coverage::{
    overall_summary, parse_jacoco_file, CoverageAnalysis, CoverageAnalyzer, OverallCoverage,
};
use crate::detectors::surefire::{read_reports_dir, SurefireResults};
use crate::io::persistence::{TestFileWriter, WriteOutcome};
use crate::synthesis::orchestration::{
    generate_junit_tests, generate_spec_based_tests, JunitGenerationResult, SpecGenerationRequest,
    SpecGenerationResult,
};

/// Coverage analysis together with report-wide totals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageResult {
    pub min_coverage: f64,
    pub overall: OverallCoverage,
    #[serde(flatten)]
    pub analysis: CoverageAnalysis,
}

/// Outcome of a coverage threshold check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GateResult {
    pub threshold: f64,
    pub passed: bool,
    pub overall: OverallCoverage,
}

/// Main testforge engine
#[derive(Debug, Clone)]
pub struct TestforgeEngine {
    config: Arc<TestforgeConfig>,
}

impl TestforgeEngine {
    /// Create an engine after validating the configuration.
    pub fn new(config: TestforgeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &TestforgeConfig {
        &self.config
    }

    /// Analyze the JaCoCo report under `project_root`.
    pub fn analyze_coverage(&self, project_root: &Path, min_coverage: Option<f64>) -> Result<CoverageResult> {
        let min_coverage = checked_ratio(
            min_coverage.unwrap_or(self.config.coverage.min_coverage),
            "min_coverage",
        )?;
        info!("Analyzing coverage for {}", project_root.display());

        let report_path = CoverageDiscovery::locate_report(project_root, &self.config.coverage)?;
        let report = parse_jacoco_file(&report_path)?;
        let report_file = report_path.display().to_string();

        Ok(CoverageResult {
            min_coverage,
            overall: overall_summary(&report, report_file.clone()),
            analysis: CoverageAnalyzer::new(min_coverage).analyze_report(&report, report_file),
        })
    }

    /// Compare report-wide instruction coverage against a threshold.
    pub fn coverage_gate(&self, project_root: &Path, threshold: Option<f64>) -> Result<GateResult> {
        let threshold = checked_ratio(
            threshold.unwrap_or(self.config.coverage.min_coverage),
            "threshold",
        )?;
        let report_path = CoverageDiscovery::locate_report(project_root, &self.config.coverage)?;
        let report = parse_jacoco_file(&report_path)?;
        let overall = overall_summary(&report, report_path.display().to_string());
        let passed = overall.meets_threshold(threshold);

        info!(
            "Coverage gate {}: {:.1}% against {:.1}%",
            if passed { "passed" } else { "failed" },
            overall.instruction_ratio * 100.0,
            threshold * 100.0
        );
        Ok(GateResult {
            threshold,
            passed,
            overall,
        })
    }

    /// Boundary-value and equivalence cases for one method.
    pub fn generate_spec_based_tests(
        &self,
        classes: &[ClassSignature],
        request: &SpecGenerationRequest,
    ) -> Result<SpecGenerationResult> {
        generate_spec_based_tests(classes, request, &self.config.generation)
    }

    /// Write a spec-based skeleton below the project's test source root.
    pub fn write_spec_skeleton(
        &self,
        project_root: &Path,
        result: &SpecGenerationResult,
        overwrite: Option<bool>,
    ) -> Result<WriteOutcome> {
        self.writer(project_root, overwrite).write(
            &result.target.package,
            &result.test_class_name,
            &result.skeleton,
        )
    }

    /// One skeleton per class with public methods, written below `project_root`.
    pub fn generate_junit_tests(
        &self,
        classes: &[ClassSignature],
        project_root: &Path,
        overwrite: Option<bool>,
    ) -> Result<JunitGenerationResult> {
        if !project_root.is_dir() {
            return Err(TestforgeError::validation_field(
                format!("Project root is not a directory: {}", project_root.display()),
                "project_root",
            ));
        }
        generate_junit_tests(
            classes,
            &self.writer(project_root, overwrite),
            &self.config.output.test_class_suffix,
        )
    }

    pub fn summarize_project(&self, classes: &[ClassSignature]) -> ProjectSummary {
        summarize(classes)
    }

    /// Read Surefire results; a missing directory gives empty results.
    pub fn test_results(&self, reports_dir: &Path) -> Result<SurefireResults> {
        read_reports_dir(reports_dir)
    }

    fn writer(&self, project_root: &Path, overwrite: Option<bool>) -> TestFileWriter {
        let writer = TestFileWriter::new(project_root, &self.config.output);
        match overwrite {
            Some(overwrite) => writer.with_overwrite(overwrite),
            None => writer,
        }
    }
}

fn checked_ratio(value: f64, field: &str) -> Result<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(TestforgeError::validation_field(
            format!("{field} must be between 0.0 and 1.0, got {value}"),
            field,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::signatures::parse_signatures;
    use std::fs;
    use tempfile::TempDir;

    const REPORT: &str = r#"<report name="demo">
  <package name="com/demo">
    <class name="com/demo/Greeter" sourcefilename="Greeter.java">
      <method name="greet" desc="(Ljava/lang/String;)Ljava/lang/String;" line="5">
        <counter type="INSTRUCTION" missed="4" covered="6"/>
        <line nr="6" mi="4" ci="0" mb="0" cb="0"/>
      </method>
      <counter type="INSTRUCTION" missed="4" covered="6"/>
    </class>
  </package>
  <counter type="INSTRUCTION" missed="4" covered="6"/>
  <counter type="BRANCH" missed="0" covered="0"/>
</report>"#;

    fn project_with_report() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("target/site/jacoco");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("jacoco.xml"), REPORT).unwrap();
        tmp
    }

    fn engine() -> TestforgeEngine {
        TestforgeEngine::new(TestforgeConfig::default()).unwrap()
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = TestforgeConfig::default();
        config.generation.max_cases = 0;
        assert!(TestforgeEngine::new(config).is_err());
    }

    #[test]
    fn analyze_coverage_combines_overall_and_classes() {
        let project = project_with_report();
        let result = engine().analyze_coverage(project.path(), None).unwrap();
        assert_eq!(result.min_coverage, 0.8);
        assert_eq!(result.analysis.classes.len(), 1);
        assert_eq!(result.overall.instruction_covered, 6);

        let json = serde_json::to_value(&result).unwrap();
        assert!(json["classes"].is_array());
        assert!(json["report_file"].as_str().unwrap().ends_with("jacoco.xml"));
    }

    #[test]
    fn out_of_range_threshold_is_a_validation_error() {
        let project = project_with_report();
        let err = engine().analyze_coverage(project.path(), Some(1.5)).unwrap_err();
        assert!(matches!(err, TestforgeError::Validation { .. }));
    }

    #[test]
    fn gate_compares_instruction_ratio() {
        let project = project_with_report();
        assert!(engine().coverage_gate(project.path(), Some(0.6)).unwrap().passed);
        assert!(!engine().coverage_gate(project.path(), None).unwrap().passed);
    }

    #[test]
    fn missing_report_is_reported_as_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = engine().coverage_gate(tmp.path(), None).unwrap_err();
        assert!(err.is_report_not_found());
    }

    #[test]
    fn spec_skeleton_is_written_once() {
        let tmp = TempDir::new().unwrap();
        let classes = parse_signatures(
            r#"[{"package":"com.demo","class_name":"Greeter","file_path":"Greeter.java",
                 "methods":[{"name":"greet","return_type":"String","parameters":[{"name":"who","type":"String"}],
                             "modifiers":["public"],"is_static":false,"is_constructor":false}]}]"#,
        )
        .unwrap();
        let engine = engine();
        let result = engine
            .generate_spec_based_tests(&classes, &SpecGenerationRequest::new("com.demo.Greeter", "greet"))
            .unwrap();
        assert_eq!(result.test_class_name, "GreeterGreetGeneratedTest");

        let written = engine.write_spec_skeleton(tmp.path(), &result, None).unwrap();
        assert!(written.is_written());
        assert!(written
            .path()
            .ends_with("src/test/java/com/demo/GreeterGreetGeneratedTest.java"));

        let again = engine.write_spec_skeleton(tmp.path(), &result, None).unwrap();
        assert!(!again.is_written());
        assert!(engine.write_spec_skeleton(tmp.path(), &result, Some(true)).unwrap().is_written());
    }

    #[test]
    fn junit_generation_requires_existing_root() {
        let tmp = TempDir::new().unwrap();
        let err = engine()
            .generate_junit_tests(&[], &tmp.path().join("missing"), None)
            .unwrap_err();
        assert!(matches!(err, TestforgeError::Validation { .. }));
    }
}
