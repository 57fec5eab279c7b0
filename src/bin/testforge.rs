//! Testforge CLI - coverage-driven JUnit test synthesis for Java projects
//!
//! Reads JaCoCo and Surefire reports, proposes boundary-value inputs and
//! writes JUnit 5 skeletons. The `mcp-stdio` command serves the same
//! operations to IDE agents over JSON-RPC.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod mcp;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging; RUST_LOG takes precedence over --verbose
    let log_level = if cli.verbose { "debug" } else { "info" };

    // stdout carries command output and, for mcp-stdio, the JSON-RPC channel
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = cli::load_configuration(cli.config.as_deref())?;

    // Execute command
    match cli.command {
        Commands::AnalyzeCoverage(args) => {
            cli::analyze_coverage_command(args, &config).await?;
        }
        Commands::CoverageGate(args) => {
            cli::coverage_gate_command(args, &config).await?;
        }
        Commands::GenerateCases(args) => {
            cli::generate_cases_command(args, &config).await?;
        }
        Commands::GenerateTests(args) => {
            cli::generate_tests_command(args, &config).await?;
        }
        Commands::SummarizeProject(args) => {
            cli::summarize_project_command(args, &config).await?;
        }
        Commands::TestResults(args) => {
            cli::test_results_command(args, &config).await?;
        }
        Commands::PrintDefaultConfig => {
            cli::print_default_config().await?;
        }
        Commands::InitConfig(args) => {
            cli::init_config(args).await?;
        }
        Commands::ValidateConfig(args) => {
            cli::validate_config(args).await?;
        }
        Commands::McpStdio => {
            cli::mcp_stdio_command(config).await?;
        }
    }

    Ok(())
}
