//! Coverage analysis and gate commands.

use owo_colors::OwoColorize;
use tabled::{settings::Style as TableStyle, Table, Tabled};
use tracing::warn;

use crate::cli::args::{AnalyzeCoverageArgs, CoverageGateArgs, OutputFormat};
use crate::cli::output::{colored_ratio, format_ranges, format_ratio, print_json};
use testforge_rs::api::engine::{CoverageResult, TestforgeEngine};
use testforge_rs::core::config::TestforgeConfig;

#[derive(Tabled)]
struct ClassRow {
    #[tabled(rename = "Class")]
    class: String,
    #[tabled(rename = "Instructions")]
    instructions: String,
    #[tabled(rename = "Branches")]
    branches: String,
    #[tabled(rename = "Uncovered lines")]
    uncovered: usize,
}

/// Analyze the JaCoCo report of a Maven project
pub async fn analyze_coverage_command(
    args: AnalyzeCoverageArgs,
    config: &TestforgeConfig,
) -> anyhow::Result<()> {
    let engine = TestforgeEngine::new(config.clone())?;
    let result = engine.analyze_coverage(&args.project_root, args.min_coverage)?;

    match args.format {
        OutputFormat::Json => print_json(&result),
        OutputFormat::Table => {
            display_coverage(&result);
            Ok(())
        }
    }
}

fn display_coverage(result: &CoverageResult) {
    let threshold = result.min_coverage;
    println!(
        "{} {}",
        "📊 Coverage report:".bright_blue().bold(),
        result.analysis.report_file.cyan()
    );
    println!(
        "   instructions {}   branches {}   threshold {}",
        colored_ratio(result.overall.instruction_ratio, threshold),
        colored_ratio(result.overall.branch_ratio, threshold),
        format_ratio(threshold)
    );
    println!();

    if result.analysis.classes.is_empty() {
        println!("{}", "No classes found in the report".yellow());
        return;
    }

    let rows: Vec<ClassRow> = result
        .analysis
        .classes
        .iter()
        .map(|class| ClassRow {
            class: class.fqn.clone(),
            instructions: format_ratio(class.instruction_coverage),
            branches: format_ratio(class.branch_coverage),
            uncovered: class.uncovered_lines_total,
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(TableStyle::rounded());
    println!("{}", table);

    let with_guidance: Vec<_> = result
        .analysis
        .classes
        .iter()
        .filter(|class| {
            !class.recommendations.is_empty()
                || class.methods.iter().any(|m| !m.recommendations.is_empty())
        })
        .collect();
    if with_guidance.is_empty() {
        println!();
        println!("{}", "✅ Every class meets the coverage threshold".bright_green().bold());
        return;
    }

    println!();
    println!("{}", "💡 Recommendations".bright_yellow().bold());
    for class in with_guidance {
        println!();
        println!("  {}", class.fqn.bold());
        for recommendation in &class.recommendations {
            println!("    • {}", recommendation);
        }
        for method in class.methods.iter().filter(|m| !m.recommendations.is_empty()) {
            let ranges: Vec<(u32, u32)> = method
                .uncovered_line_ranges
                .iter()
                .map(|range| (range.start, range.end))
                .collect();
            let lines = if ranges.is_empty() {
                String::new()
            } else {
                format!(" (lines {})", format_ranges(&ranges))
            };
            println!(
                "    {} {}{}",
                "▸".dimmed(),
                method.name.cyan(),
                lines.dimmed()
            );
            for recommendation in &method.recommendations {
                println!("      - {}", recommendation);
            }
        }
    }
}

/// Fail with exit status 1 when instruction coverage is below the threshold
pub async fn coverage_gate_command(
    args: CoverageGateArgs,
    config: &TestforgeConfig,
) -> anyhow::Result<()> {
    let engine = TestforgeEngine::new(config.clone())?;
    let gate = engine.coverage_gate(&args.project_root, args.threshold)?;

    let actual = colored_ratio(gate.overall.instruction_ratio, gate.threshold);
    if gate.passed {
        println!(
            "{} {} >= {}",
            "✅ Coverage gate passed:".bright_green().bold(),
            actual,
            format_ratio(gate.threshold)
        );
        Ok(())
    } else {
        warn!(
            "Instruction coverage {:.3} below threshold {:.3}",
            gate.overall.instruction_ratio, gate.threshold
        );
        eprintln!(
            "{} {} < {}",
            "❌ Coverage gate failed:".red().bold(),
            actual,
            format_ratio(gate.threshold)
        );
        std::process::exit(1);
    }
}
