//! Maven Surefire result reader.
//!
//! Reads the `TEST-*.xml` files Surefire leaves under
//! `target/surefire-reports` and summarizes suites and individual cases.

use std::fs;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::core::errors::{Result, TestforgeError};
use crate::detectors::coverage::parsers::attribute_value;

const FORMAT: &str = "surefire";

/// Default Surefire output directory relative to a Maven project root.
pub const DEFAULT_REPORTS_DIR: &str = "target/surefire-reports";

/// Outcome of a single test case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestCaseStatus {
    Passed,
    Failure,
    Error,
    Skipped,
}

/// One `<testcase>` element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCaseResult {
    pub class_name: String,
    pub test_name: String,
    /// Raw `time` attribute, seconds
    pub time: String,
    pub status: TestCaseStatus,
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub failure_type: Option<String>,
    pub details: Option<String>,
}

/// One `TEST-*.xml` file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSuiteResult {
    pub suite_name: String,
    pub file: String,
    pub tests: u64,
    pub failures: u64,
    pub errors: u64,
    pub skipped: u64,
    pub cases: Vec<TestCaseResult>,
}

/// Totals across all suites, taken from the suite attributes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRunSummary {
    pub total_tests: u64,
    pub failures: u64,
    pub errors: u64,
    pub skipped: u64,
}

impl TestRunSummary {
    pub fn is_green(&self) -> bool {
        self.failures == 0 && self.errors == 0
    }
}

/// Everything read from a reports directory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurefireResults {
    pub suites: Vec<TestSuiteResult>,
    pub summary: TestRunSummary,
}

/// Read every `TEST-*.xml` file directly under `reports_dir`.
///
/// A missing directory is not an error: it yields no suites and zero totals.
pub fn read_reports_dir(reports_dir: &Path) -> Result<SurefireResults> {
    if !reports_dir.is_dir() {
        debug!("No Surefire reports at {}", reports_dir.display());
        return Ok(SurefireResults::default());
    }

    let mut results = SurefireResults::default();
    for path in report_files(reports_dir) {
        let suite = parse_suite_file(&path)?;
        let summary = &mut results.summary;
        summary.total_tests = summary.total_tests.saturating_add(suite.tests);
        summary.failures = summary.failures.saturating_add(suite.failures);
        summary.errors = summary.errors.saturating_add(suite.errors);
        summary.skipped = summary.skipped.saturating_add(suite.skipped);
        results.suites.push(suite);
    }

    info!(
        "Read {} Surefire suites from {} ({} tests, {} failures, {} errors)",
        results.suites.len(),
        reports_dir.display(),
        results.summary.total_tests,
        results.summary.failures,
        results.summary.errors
    );
    Ok(results)
}

fn report_files(reports_dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(reports_dir)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            let name = entry.file_name().to_string_lossy();
            name.starts_with("TEST-") && name.ends_with(".xml")
        })
        .map(|entry| entry.into_path())
        .collect()
}

/// Parse one Surefire XML file; the file name stands in for a missing suite name.
pub fn parse_suite_file(path: &Path) -> Result<TestSuiteResult> {
    let bytes = fs::read(path).map_err(|err| {
        TestforgeError::io(
            format!("Failed to read Surefire report at {}", path.display()),
            err,
        )
    })?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut suite = parse_suite_xml(&bytes, &file_name)
        .map_err(|err| err.in_file(path.display().to_string()))?;
    suite.file = path.display().to_string();
    Ok(suite)
}

/// Parse a Surefire `<testsuite>` document held in memory.
pub fn parse_suite_xml(bytes: &[u8], fallback_name: &str) -> Result<TestSuiteResult> {
    let mut reader = Reader::from_reader(bytes);
    reader.trim_text(true);
    let mut buf = Vec::new();

    let mut suite: Option<TestSuiteResult> = None;
    let mut case: Option<CaseBuilder> = None;
    let mut capture: Option<Capture> = None;
    let mut depth = 0usize;

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|err| {
            TestforgeError::parse(
                FORMAT,
                format!(
                    "Failed to parse Surefire XML at byte {}: {}",
                    reader.buffer_position(),
                    err
                ),
            )
        })?;

        match event {
            Event::Start(ref tag) | Event::Empty(ref tag) => {
                let is_empty = matches!(event, Event::Empty(_));
                let element = tag.name();
                match (depth, element.as_ref()) {
                    (0, b"testsuite") => suite = Some(open_suite(tag, fallback_name)?),
                    (0, _) => {
                        return Err(TestforgeError::parse(
                            FORMAT,
                            format!(
                                "Expected a <testsuite> root element, found <{}>",
                                String::from_utf8_lossy(element.as_ref())
                            ),
                        ));
                    }
                    (1, b"testcase") => case = Some(CaseBuilder::open(tag)),
                    (2, b"failure") | (2, b"error") | (2, b"skipped") => {
                        if let Some(case) = case.as_mut() {
                            let kind = match element.as_ref() {
                                b"failure" => TestCaseStatus::Failure,
                                b"error" => TestCaseStatus::Error,
                                _ => TestCaseStatus::Skipped,
                            };
                            case.record(kind, tag);
                            if !is_empty && kind != TestCaseStatus::Skipped {
                                capture = Some(Capture { kind, depth: depth + 1 });
                            }
                        }
                    }
                    _ => {}
                }

                if is_empty {
                    if depth == 1 {
                        close_case(&mut suite, &mut case);
                    }
                } else {
                    depth += 1;
                }
            }
            Event::Text(text) => {
                if let (Some(open), Some(case)) = (capture.as_ref(), case.as_mut()) {
                    let text = text
                        .unescape()
                        .map(|value| value.into_owned())
                        .unwrap_or_else(|_| String::from_utf8_lossy(&text).into_owned());
                    case.append_text(open.kind, &text);
                }
            }
            Event::CData(data) => {
                if let (Some(open), Some(case)) = (capture.as_ref(), case.as_mut()) {
                    case.append_text(open.kind, &String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::End(_) => {
                if capture.as_ref().is_some_and(|open| open.depth == depth) {
                    capture = None;
                }
                depth = depth.saturating_sub(1);
                if depth == 1 {
                    close_case(&mut suite, &mut case);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    suite.ok_or_else(|| TestforgeError::parse(FORMAT, "Document has no <testsuite> root element"))
}

fn open_suite(tag: &BytesStart<'_>, fallback_name: &str) -> Result<TestSuiteResult> {
    Ok(TestSuiteResult {
        suite_name: attribute_value(tag, b"name").unwrap_or_else(|| fallback_name.to_string()),
        file: String::new(),
        tests: count_attribute(tag, b"tests")?,
        failures: count_attribute(tag, b"failures")?,
        errors: count_attribute(tag, b"errors")?,
        skipped: count_attribute(tag, b"skipped")?,
        cases: Vec::new(),
    })
}

fn close_case(suite: &mut Option<TestSuiteResult>, case: &mut Option<CaseBuilder>) {
    if let (Some(suite), Some(case)) = (suite.as_mut(), case.take()) {
        suite.cases.push(case.finish());
    }
}

/// Failure or error element whose body text is being collected
struct Capture {
    kind: TestCaseStatus,
    depth: usize,
}

/// Detail recorded from a `<failure>` or `<error>` child
#[derive(Default)]
struct Problem {
    message: Option<String>,
    failure_type: Option<String>,
    text: String,
}

struct CaseBuilder {
    class_name: String,
    test_name: String,
    time: String,
    failure: Option<Problem>,
    error: Option<Problem>,
    skipped: bool,
}

impl CaseBuilder {
    fn open(tag: &BytesStart<'_>) -> Self {
        Self {
            class_name: attribute_value(tag, b"classname").unwrap_or_default(),
            test_name: attribute_value(tag, b"name").unwrap_or_default(),
            time: attribute_value(tag, b"time").unwrap_or_else(|| "0".to_string()),
            failure: None,
            error: None,
            skipped: false,
        }
    }

    fn record(&mut self, kind: TestCaseStatus, tag: &BytesStart<'_>) {
        let problem = || Problem {
            message: attribute_value(tag, b"message"),
            failure_type: attribute_value(tag, b"type"),
            text: String::new(),
        };
        match kind {
            TestCaseStatus::Failure if self.failure.is_none() => self.failure = Some(problem()),
            TestCaseStatus::Error if self.error.is_none() => self.error = Some(problem()),
            TestCaseStatus::Skipped => self.skipped = true,
            _ => {}
        }
    }

    fn append_text(&mut self, kind: TestCaseStatus, text: &str) {
        let target = match kind {
            TestCaseStatus::Failure => self.failure.as_mut(),
            TestCaseStatus::Error => self.error.as_mut(),
            _ => None,
        };
        if let Some(problem) = target {
            problem.text.push_str(text);
        }
    }

    /// Failure beats error, error beats skipped.
    fn finish(self) -> TestCaseResult {
        let (status, problem) = match (self.failure, self.error) {
            (Some(failure), _) => (TestCaseStatus::Failure, Some(failure)),
            (None, Some(error)) => (TestCaseStatus::Error, Some(error)),
            (None, None) if self.skipped => (TestCaseStatus::Skipped, None),
            (None, None) => (TestCaseStatus::Passed, None),
        };

        let (message, failure_type, details) = match problem {
            Some(problem) => (
                problem.message,
                problem.failure_type,
                Some(problem.text.trim().to_string()),
            ),
            None => (None, None, None),
        };

        TestCaseResult {
            class_name: self.class_name,
            test_name: self.test_name,
            time: self.time,
            status,
            message,
            failure_type,
            details,
        }
    }
}

fn count_attribute(tag: &BytesStart<'_>, name: &[u8]) -> Result<u64> {
    match attribute_value(tag, name) {
        None => Ok(0),
        Some(raw) => raw.trim().parse().map_err(|_| {
            TestforgeError::parse(
                FORMAT,
                format!(
                    "Invalid {} count '{}' on <testsuite>",
                    String::from_utf8_lossy(name),
                    raw
                ),
            )
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SUITE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuite name="com.shop.CartTest" time="0.12" tests="4" errors="1" skipped="1" failures="1">
  <properties>
    <property name="java.version" value="17"/>
  </properties>
  <testcase name="addsItem" classname="com.shop.CartTest" time="0.01"/>
  <testcase name="rejectsNegative" classname="com.shop.CartTest" time="0.02">
    <failure message="expected: &lt;1&gt; but was: &lt;0&gt;" type="org.opentest4j.AssertionFailedError">
      org.opentest4j.AssertionFailedError: expected: &lt;1&gt; but was: &lt;0&gt;
    </failure>
    <system-out>noise</system-out>
  </testcase>
  <testcase name="loadsPrices" classname="com.shop.CartTest" time="0.03">
    <error message="boom" type="java.lang.IllegalStateException"><![CDATA[java.lang.IllegalStateException: boom
	at com.shop.Cart.load(Cart.java:40)]]></error>
  </testcase>
  <testcase name="slowPath" classname="com.shop.CartTest" time="0">
    <skipped message="disabled"/>
  </testcase>
</testsuite>
"#;

    #[test]
    fn parses_case_statuses() {
        let suite = parse_suite_xml(SUITE.as_bytes(), "TEST-x.xml").unwrap();
        assert_eq!(suite.suite_name, "com.shop.CartTest");
        assert_eq!((suite.tests, suite.failures, suite.errors, suite.skipped), (4, 1, 1, 1));

        let statuses: Vec<TestCaseStatus> = suite.cases.iter().map(|c| c.status).collect();
        assert_eq!(
            statuses,
            vec![
                TestCaseStatus::Passed,
                TestCaseStatus::Failure,
                TestCaseStatus::Error,
                TestCaseStatus::Skipped
            ]
        );

        let passed = &suite.cases[0];
        assert_eq!(passed.time, "0.01");
        assert!(passed.message.is_none() && passed.details.is_none());

        let failure = &suite.cases[1];
        assert_eq!(failure.message.as_deref(), Some("expected: <1> but was: <0>"));
        assert_eq!(
            failure.failure_type.as_deref(),
            Some("org.opentest4j.AssertionFailedError")
        );
        assert_eq!(
            failure.details.as_deref(),
            Some("org.opentest4j.AssertionFailedError: expected: <1> but was: <0>")
        );

        let error = &suite.cases[2];
        assert_eq!(error.message.as_deref(), Some("boom"));
        assert!(error
            .details
            .as_deref()
            .unwrap()
            .starts_with("java.lang.IllegalStateException: boom"));

        let skipped = &suite.cases[3];
        assert!(skipped.message.is_none());
    }

    #[test]
    fn failure_wins_over_error_regardless_of_order() {
        let xml = r#"<testsuite tests="1"><testcase name="t" classname="C">
            <error message="e"/><failure message="f"/></testcase></testsuite>"#;
        let suite = parse_suite_xml(xml.as_bytes(), "TEST-C.xml").unwrap();
        assert_eq!(suite.suite_name, "TEST-C.xml");
        assert_eq!(suite.cases[0].status, TestCaseStatus::Failure);
        assert_eq!(suite.cases[0].message.as_deref(), Some("f"));
        assert_eq!(suite.cases[0].details.as_deref(), Some(""));
    }

    #[test]
    fn rejects_non_suite_root() {
        let err = parse_suite_xml(b"<testsuites/>", "x").unwrap_err();
        assert!(err.to_string().contains("<testsuite>"));
    }

    #[test]
    fn missing_directory_yields_empty_results() {
        let tmp = TempDir::new().unwrap();
        let results = read_reports_dir(&tmp.path().join("target/surefire-reports")).unwrap();
        assert!(results.suites.is_empty());
        assert_eq!(results.summary, TestRunSummary::default());
        assert!(results.summary.is_green());
    }

    #[test]
    fn reads_only_test_prefixed_xml_files() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("TEST-com.shop.CartTest.xml"), SUITE).unwrap();
        fs::write(
            tmp.path().join("TEST-com.shop.MoneyTest.xml"),
            r#"<testsuite name="com.shop.MoneyTest" tests="2"><testcase name="a" classname="M"/><testcase name="b" classname="M"/></testsuite>"#,
        )
        .unwrap();
        fs::write(tmp.path().join("com.shop.CartTest.txt"), "summary").unwrap();
        fs::write(tmp.path().join("other.xml"), "<nope/>").unwrap();

        let results = read_reports_dir(tmp.path()).unwrap();
        assert_eq!(results.suites.len(), 2);
        assert_eq!(results.suites[0].suite_name, "com.shop.CartTest");
        assert!(results.suites[0].file.ends_with("TEST-com.shop.CartTest.xml"));
        assert_eq!(
            results.summary,
            TestRunSummary {
                total_tests: 6,
                failures: 1,
                errors: 1,
                skipped: 1
            }
        );
        assert!(!results.summary.is_green());
    }

    #[test]
    fn summary_totals_saturate() {
        let tmp = TempDir::new().unwrap();
        let max = u64::MAX;
        for name in ["TEST-A.xml", "TEST-B.xml"] {
            fs::write(
                tmp.path().join(name),
                format!(r#"<testsuite name="{name}" tests="{max}" failures="{max}" errors="1" skipped="0"/>"#),
            )
            .unwrap();
        }

        let results = read_reports_dir(tmp.path()).unwrap();
        assert_eq!(results.suites.len(), 2);
        assert_eq!(
            results.summary,
            TestRunSummary {
                total_tests: u64::MAX,
                failures: u64::MAX,
                errors: 2,
                skipped: 0
            }
        );
    }

    #[test]
    fn suite_and_case_attributes_are_unescaped() {
        let xml = r#"<testsuite name="Cart &amp; Money" tests="1"><testcase name="a&lt;b" classname="C"/></testsuite>"#;
        let suite = parse_suite_xml(xml.as_bytes(), "TEST-C.xml").unwrap();
        assert_eq!(suite.suite_name, "Cart & Money");
        assert_eq!(suite.cases[0].test_name, "a<b");
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TestCaseStatus::Failure).unwrap(),
            "\"failure\""
        );
    }
}
