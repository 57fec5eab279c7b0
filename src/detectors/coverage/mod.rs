//! Coverage report reader.
//!
//! Turns a parsed JaCoCo report into per-class and per-method coverage facts,
//! groups uncovered lines into ranges and attaches improvement guidance. The
//! resulting class list is ordered worst-covered first.

pub mod parsers;
pub mod ranges;
pub mod recommendations;
pub mod types;

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use crate::core::config::CoverageConfig;
use crate::core::coverage_discovery::CoverageDiscovery;
use crate::core::errors::Result;

pub use parsers::{
    parse_jacoco_file, parse_jacoco_xml, ClassElement, JacocoReport, LineEntry, MethodElement,
    PackageElement,
};
pub use ranges::group_into_ranges;
pub use recommendations::{class_recommendations, method_recommendations, ClassFacts, MethodFacts};
pub use types::{
    ClassCoverage, CounterKind, CoverageAnalysis, CoverageCounter, LineRange, MethodCoverage,
    OverallCoverage,
};

/// Counter of `kind` among an element's immediate counters; zeros when absent.
pub fn counter_for(counters: &[CoverageCounter], kind: CounterKind) -> CoverageCounter {
    counters
        .iter()
        .find(|counter| counter.kind == kind)
        .copied()
        .unwrap_or_else(|| CoverageCounter::empty(kind))
}

/// Dotted package name from JaCoCo's slash-separated form.
pub fn normalize_package(raw: &str) -> String {
    raw.replace(['/', '\\'], ".").trim_matches('.').to_string()
}

/// Simple class name from the raw class name, or the source file stem.
pub fn simple_class_name(raw_class: Option<&str>, source_file: &str) -> String {
    match raw_class {
        Some(raw) if !raw.is_empty() => raw.rsplit(['/', '\\']).next().unwrap_or(raw).to_string(),
        _ => source_file
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(source_file)
            .to_string(),
    }
}

/// Report-wide instruction and branch totals.
pub fn overall_summary(report: &JacocoReport, report_file: impl Into<String>) -> OverallCoverage {
    OverallCoverage::from_counters(
        report_file,
        counter_for(&report.counters, CounterKind::Instruction),
        counter_for(&report.counters, CounterKind::Branch),
    )
}

/// Coverage reader and recommendation engine
#[derive(Debug, Clone)]
pub struct CoverageAnalyzer {
    min_coverage: f64,
}

impl CoverageAnalyzer {
    pub fn new(min_coverage: f64) -> Self {
        Self { min_coverage }
    }

    pub fn min_coverage(&self) -> f64 {
        self.min_coverage
    }

    /// Locate the project's report and analyze it.
    pub fn analyze_project(&self, project_root: &Path, config: &CoverageConfig) -> Result<CoverageAnalysis> {
        let report_path = CoverageDiscovery::locate_report(project_root, config)?;
        self.analyze_file(&report_path)
    }

    /// Parse and analyze a report file.
    pub fn analyze_file(&self, path: &Path) -> Result<CoverageAnalysis> {
        let report = parse_jacoco_file(path)?;
        let analysis = self.analyze_report(&report, path.display().to_string());
        info!(
            "Analyzed {} classes from {}",
            analysis.classes.len(),
            path.display()
        );
        Ok(analysis)
    }

    /// Analyze an already-parsed report.
    pub fn analyze_report(&self, report: &JacocoReport, report_file: impl Into<String>) -> CoverageAnalysis {
        let mut classes: Vec<ClassCoverage> = report
            .packages
            .iter()
            .flat_map(|package| {
                let attribution = SourceLineAttribution::for_package(package);
                package
                    .classes
                    .iter()
                    .map(move |class| self.class_coverage(package, class, &attribution))
                    .collect::<Vec<_>>()
            })
            .collect();

        // Stable: equal ratios keep report order.
        classes.sort_by(|a, b| a.instruction_coverage.total_cmp(&b.instruction_coverage));

        CoverageAnalysis {
            report_file: report_file.into(),
            classes,
        }
    }

    fn class_coverage(
        &self,
        package: &PackageElement,
        class: &ClassElement,
        attribution: &SourceLineAttribution<'_>,
    ) -> ClassCoverage {
        let package_name = normalize_package(&package.name);
        let source_file = class.source_file_name.clone().unwrap_or_default();
        let class_name = simple_class_name(class.name.as_deref(), &source_file);
        let fqn = if package_name.is_empty() {
            class_name.clone()
        } else {
            format!("{package_name}.{class_name}")
        };

        let instruction_ratio = counter_for(&class.counters, CounterKind::Instruction).ratio();
        let branch_ratio = counter_for(&class.counters, CounterKind::Branch).ratio();

        let mut uncovered_lines_total = 0;
        let methods: Vec<MethodCoverage> = class
            .methods
            .iter()
            .map(|method| {
                let uncovered = attribution.uncovered_lines(&source_file, method);
                uncovered_lines_total += uncovered.len();

                let instruction_coverage =
                    counter_for(&method.counters, CounterKind::Instruction).ratio();
                let recommendations = method_recommendations(
                    &MethodFacts {
                        name: &method.name,
                        descriptor: &method.descriptor,
                        instruction_ratio: instruction_coverage,
                        uncovered_lines: uncovered.len(),
                    },
                    self.min_coverage,
                );

                MethodCoverage {
                    name: method.name.clone(),
                    descriptor: method.descriptor.clone(),
                    line: method.line,
                    instruction_coverage,
                    uncovered_line_ranges: group_into_ranges(uncovered),
                    recommendations,
                }
            })
            .collect();

        let recommendations = class_recommendations(
            &ClassFacts {
                fqn: &fqn,
                instruction_ratio,
                branch_ratio,
                uncovered_lines_total,
            },
            self.min_coverage,
        );

        debug!(
            "{}: instructions {:.3}, branches {:.3}, {} uncovered lines",
            fqn, instruction_ratio, branch_ratio, uncovered_lines_total
        );

        ClassCoverage {
            package: package_name,
            class_name,
            fqn,
            source_file,
            instruction_coverage: instruction_ratio,
            branch_coverage: branch_ratio,
            uncovered_lines_total,
            methods,
            recommendations,
        }
    }
}

impl Default for CoverageAnalyzer {
    fn default() -> Self {
        Self::new(CoverageConfig::default().min_coverage)
    }
}

/// Maps source-file lines back to methods for reports that only list lines
/// under `<sourcefile>`.
///
/// A method owns the lines from its declared line up to the next declared
/// method line in the same source file.
struct SourceLineAttribution<'a> {
    lines_by_file: HashMap<&'a str, &'a [LineEntry]>,
    starts_by_file: HashMap<&'a str, Vec<u32>>,
}

impl<'a> SourceLineAttribution<'a> {
    fn for_package(package: &'a PackageElement) -> Self {
        let lines_by_file = package
            .source_files
            .iter()
            .map(|file| (file.name.as_str(), file.lines.as_slice()))
            .collect();

        let mut starts_by_file: HashMap<&'a str, Vec<u32>> = HashMap::new();
        for class in &package.classes {
            let Some(file) = class.source_file_name.as_deref() else {
                continue;
            };
            let starts = starts_by_file.entry(file).or_default();
            starts.extend(class.methods.iter().map(|m| m.line).filter(|&line| line > 0));
        }
        for starts in starts_by_file.values_mut() {
            starts.sort_unstable();
            starts.dedup();
        }

        Self {
            lines_by_file,
            starts_by_file,
        }
    }

    /// Uncovered line numbers for a method, in report order.
    fn uncovered_lines(&self, source_file: &str, method: &MethodElement) -> Vec<u32> {
        if !method.lines.is_empty() {
            return uncovered_numbers(&method.lines, |_| true);
        }
        if method.line == 0 {
            return Vec::new();
        }
        let Some(lines) = self.lines_by_file.get(source_file) else {
            return Vec::new();
        };

        let start = i64::from(method.line);
        let end = self
            .starts_by_file
            .get(source_file)
            .and_then(|starts| starts.iter().find(|&&s| s > method.line))
            .map(|&next| i64::from(next))
            .unwrap_or(i64::MAX);

        uncovered_numbers(lines, |nr| nr >= start && nr < end)
    }
}

fn uncovered_numbers(lines: &[LineEntry], in_span: impl Fn(i64) -> bool) -> Vec<u32> {
    lines
        .iter()
        .filter(|line| line.is_uncovered() && in_span(line.number))
        .filter_map(|line| u32::try_from(line.number).ok())
        .collect()
}
