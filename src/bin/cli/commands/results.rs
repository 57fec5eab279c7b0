//! Surefire results command.

use owo_colors::OwoColorize;
use tabled::{settings::Style as TableStyle, Table, Tabled};

use crate::cli::args::{OutputFormat, TestResultsArgs};
use crate::cli::output::print_json;
use testforge_rs::api::engine::TestforgeEngine;
use testforge_rs::core::config::TestforgeConfig;
use testforge_rs::detectors::surefire::{SurefireResults, TestCaseStatus};

#[derive(Tabled)]
struct SuiteRow {
    #[tabled(rename = "Suite")]
    suite: String,
    #[tabled(rename = "Tests")]
    tests: u64,
    #[tabled(rename = "Failures")]
    failures: u64,
    #[tabled(rename = "Errors")]
    errors: u64,
    #[tabled(rename = "Skipped")]
    skipped: u64,
}

/// Summarize Surefire results from a reports directory
pub async fn test_results_command(
    args: TestResultsArgs,
    config: &TestforgeConfig,
) -> anyhow::Result<()> {
    let engine = TestforgeEngine::new(config.clone())?;
    let results = engine.test_results(&args.reports_dir)?;

    match args.format {
        OutputFormat::Json => print_json(&results),
        OutputFormat::Table => {
            display_results(&results);
            Ok(())
        }
    }
}

fn display_results(results: &SurefireResults) {
    if results.suites.is_empty() {
        println!("{}", "No Surefire reports found".yellow());
        return;
    }

    let rows: Vec<SuiteRow> = results
        .suites
        .iter()
        .map(|suite| SuiteRow {
            suite: suite.suite_name.clone(),
            tests: suite.tests,
            failures: suite.failures,
            errors: suite.errors,
            skipped: suite.skipped,
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(TableStyle::rounded());
    println!("{}", table);

    let broken = results
        .suites
        .iter()
        .flat_map(|suite| suite.cases.iter())
        .filter(|case| matches!(case.status, TestCaseStatus::Failure | TestCaseStatus::Error));
    for case in broken {
        println!(
            "  {} {}.{}: {}",
            "✗".red(),
            case.class_name,
            case.test_name.bold(),
            case.message.as_deref().unwrap_or("")
        );
    }

    let summary = &results.summary;
    println!();
    let line = format!(
        "{} tests, {} failures, {} errors, {} skipped",
        summary.total_tests, summary.failures, summary.errors, summary.skipped
    );
    if summary.is_green() {
        println!("{} {}", "✅".bright_green(), line.bright_green());
    } else {
        println!("{} {}", "❌".red(), line.red());
    }
}
