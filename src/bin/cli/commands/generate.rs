//! Test generation and project summary commands.

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{settings::Style as TableStyle, Table, Tabled};

use crate::cli::args::{GenerateCasesArgs, GenerateTestsArgs, OutputFormat, SummarizeProjectArgs};
use crate::cli::output::print_json;
use testforge_rs::api::engine::TestforgeEngine;
use testforge_rs::core::config::TestforgeConfig;
use testforge_rs::core::signatures::{load_signatures, ProjectSummary};
use testforge_rs::io::persistence::WriteOutcome;
use testforge_rs::synthesis::orchestration::{SpecGenerationRequest, SpecGenerationResult};

/// JSON shape of generate-cases when the skeleton was also written
#[derive(Serialize)]
struct GeneratedCasesOutput<'a> {
    #[serde(flatten)]
    result: &'a SpecGenerationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    write: Option<&'a WriteOutcome>,
}

#[derive(Tabled)]
struct CandidateRow {
    #[tabled(rename = "Parameter")]
    parameter: String,
    #[tabled(rename = "Label")]
    label: &'static str,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct CaseRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Inputs")]
    inputs: String,
}

/// Generate boundary-value cases for one method
pub async fn generate_cases_command(
    args: GenerateCasesArgs,
    config: &TestforgeConfig,
) -> anyhow::Result<()> {
    let engine = TestforgeEngine::new(config.clone())?;
    let classes = load_signatures(&args.signatures)?;

    let mut request = SpecGenerationRequest::new(args.class_fqn, args.method);
    if let Some(types) = args.param_types {
        request = request.with_parameter_types(types);
    }
    if let Some(spec) = args.spec {
        request = request.with_spec(spec);
    }
    if let Some(max_cases) = args.max_cases {
        request = request.with_max_cases(max_cases);
    }

    let result = engine.generate_spec_based_tests(&classes, &request)?;

    let write = match (&args.project_root, args.write) {
        (Some(root), true) => {
            let overwrite = args.overwrite.then_some(true);
            Some(engine.write_spec_skeleton(root, &result, overwrite)?)
        }
        _ => None,
    };

    match args.format {
        OutputFormat::Json => print_json(&GeneratedCasesOutput {
            result: &result,
            write: write.as_ref(),
        }),
        OutputFormat::Table => {
            display_cases(&result);
            if let Some(outcome) = &write {
                display_write(outcome);
            }
            Ok(())
        }
    }
}

fn display_cases(result: &SpecGenerationResult) {
    let target = &result.target;
    println!(
        "{} {}#{}",
        "🧪 Cases for".bright_blue().bold(),
        target.class_fqn.cyan(),
        target.method.cyan()
    );
    if let Some(warning) = &result.spec_warning {
        println!("{} {}", "⚠️  Parameter hints ignored:".yellow(), warning);
    }
    println!();

    let candidates: Vec<CandidateRow> = target
        .parameters
        .iter()
        .flat_map(|param| {
            param.candidates.iter().map(move |candidate| CandidateRow {
                parameter: format!("{}: {}", param.name, param.type_name),
                label: candidate.label,
                kind: candidate.kind.to_string(),
                value: json_scalar(&candidate.value),
            })
        })
        .collect();
    if !candidates.is_empty() {
        let mut table = Table::new(candidates);
        table.with(TableStyle::rounded());
        println!("{}", table);
        println!();
    }

    let cases: Vec<CaseRow> = result
        .test_cases
        .iter()
        .map(|case| CaseRow {
            index: case.index,
            inputs: case
                .values
                .iter()
                .map(|(name, value)| format!("{name}={}", json_scalar(value)))
                .collect::<Vec<_>>()
                .join(", "),
        })
        .collect();
    println!(
        "{} {} (cap {})",
        "Generated cases:".bold(),
        result.test_cases.len(),
        result.max_cases
    );
    if !cases.is_empty() {
        let mut table = Table::new(cases);
        table.with(TableStyle::rounded());
        println!("{}", table);
    }
    println!();
    println!("{}", result.skeleton);
}

fn display_write(outcome: &WriteOutcome) {
    match outcome {
        WriteOutcome::Written(path) => println!(
            "{} {}",
            "✅ Wrote".bright_green().bold(),
            path.display().to_string().cyan()
        ),
        WriteOutcome::Skipped(path) => println!(
            "{} {} {}",
            "⏭️  Skipped existing".yellow(),
            path.display(),
            "(use --overwrite to replace)".dimmed()
        ),
    }
}

fn json_scalar<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

/// Write JUnit skeletons for every class with public methods
pub async fn generate_tests_command(
    args: GenerateTestsArgs,
    config: &TestforgeConfig,
) -> anyhow::Result<()> {
    let engine = TestforgeEngine::new(config.clone())?;
    let classes = load_signatures(&args.signatures)?;
    let overwrite = args.overwrite.then_some(true);
    let result = engine.generate_junit_tests(&classes, &args.project_root, overwrite)?;

    match args.format {
        OutputFormat::Json => print_json(&result),
        OutputFormat::Table => {
            for path in &result.generated_files {
                println!("{} {}", "✅ Wrote".bright_green(), path.cyan());
            }
            for path in &result.skipped_files {
                println!("{} {}", "⏭️  Skipped existing".yellow(), path);
            }
            println!();
            display_summary(&result.summary);
            println!(
                "{} generated, {} skipped",
                result.generated_files.len().to_string().bright_green(),
                result.skipped_files.len().to_string().yellow()
            );
            Ok(())
        }
    }
}

/// Count classes and methods in a signatures document
pub async fn summarize_project_command(
    args: SummarizeProjectArgs,
    config: &TestforgeConfig,
) -> anyhow::Result<()> {
    let engine = TestforgeEngine::new(config.clone())?;
    let classes = load_signatures(&args.signatures)?;
    let summary = engine.summarize_project(&classes);

    match args.format {
        OutputFormat::Json => print_json(&summary),
        OutputFormat::Table => {
            display_summary(&summary);
            Ok(())
        }
    }
}

fn display_summary(summary: &ProjectSummary) {
    #[derive(Tabled)]
    struct SummaryRow {
        #[tabled(rename = "Metric")]
        metric: &'static str,
        #[tabled(rename = "Count")]
        count: usize,
    }

    let rows = vec![
        SummaryRow {
            metric: "Classes",
            count: summary.num_classes,
        },
        SummaryRow {
            metric: "Methods",
            count: summary.num_methods,
        },
        SummaryRow {
            metric: "Public methods",
            count: summary.num_public_methods,
        },
    ];
    let mut table = Table::new(rows);
    table.with(TableStyle::rounded());
    println!("{}", table);
}
