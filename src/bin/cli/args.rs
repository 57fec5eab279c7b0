//! CLI Argument Structures
//!
//! Command and argument definitions for the testforge binary.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Coverage-driven test synthesis for Java projects
#[derive(Parser)]
#[command(name = "testforge")]
#[command(version = VERSION)]
#[command(about = "Testforge - coverage-driven JUnit test synthesis")]
#[command(long_about = "
Read JaCoCo coverage reports, propose boundary-value test inputs and
render JUnit 5 skeletons for Java projects.

Common Usage:

  # Least-covered classes first, with improvement guidance
  testforge analyze-coverage ./my-service

  # Fail CI when instruction coverage drops below 75%
  testforge coverage-gate ./my-service --threshold 0.75

  # Boundary-value cases for one method
  testforge generate-cases signatures.json --class com.shop.PriceCalculator \\
      --method applyDiscount --spec '{\"amount\":{\"min\":0,\"max\":100}}'

  # Whole-class skeletons under src/test/java
  testforge generate-tests signatures.json --project-root ./my-service

  # Start MCP server for IDE integration
  testforge mcp-stdio
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (YAML); defaults apply when omitted
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze the JaCoCo report of a Maven project
    #[command(name = "analyze-coverage")]
    AnalyzeCoverage(AnalyzeCoverageArgs),

    /// Exit with status 1 when instruction coverage is below a threshold
    #[command(name = "coverage-gate")]
    CoverageGate(CoverageGateArgs),

    /// Generate boundary-value test cases for one method
    #[command(name = "generate-cases")]
    GenerateCases(GenerateCasesArgs),

    /// Write JUnit skeletons for every class with public methods
    #[command(name = "generate-tests")]
    GenerateTests(GenerateTestsArgs),

    /// Count classes and methods in a signatures document
    #[command(name = "summarize-project")]
    SummarizeProject(SummarizeProjectArgs),

    /// Summarize Surefire test results
    #[command(name = "test-results")]
    TestResults(TestResultsArgs),

    /// Print default configuration in YAML format
    #[command(name = "print-default-config")]
    PrintDefaultConfig,

    /// Initialize a configuration file with defaults
    #[command(name = "init-config")]
    InitConfig(InitConfigArgs),

    /// Validate a testforge configuration file
    #[command(name = "validate-config")]
    ValidateConfig(ValidateConfigArgs),

    /// Run MCP server over stdio
    #[command(name = "mcp-stdio")]
    McpStdio,
}

#[derive(Args)]
pub struct AnalyzeCoverageArgs {
    /// Maven project root containing target/site/jacoco/jacoco.xml
    #[arg(value_name = "PROJECT_ROOT")]
    pub project_root: PathBuf,

    /// Coverage ratio below which guidance is produced (0.0-1.0)
    #[arg(long)]
    pub min_coverage: Option<f64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct CoverageGateArgs {
    /// Maven project root containing target/site/jacoco/jacoco.xml
    #[arg(value_name = "PROJECT_ROOT")]
    pub project_root: PathBuf,

    /// Minimum instruction coverage ratio (0.0-1.0) [default: coverage.min_coverage]
    #[arg(long)]
    pub threshold: Option<f64>,
}

#[derive(Args)]
pub struct GenerateCasesArgs {
    /// Signatures JSON produced by the Java source analyzer
    #[arg(value_name = "SIGNATURES")]
    pub signatures: PathBuf,

    /// Fully-qualified class name
    #[arg(long = "class", value_name = "FQN")]
    pub class_fqn: String,

    /// Method name (the class name for constructors)
    #[arg(long)]
    pub method: String,

    /// Parameter types selecting an overload, comma separated
    #[arg(long, value_delimiter = ',')]
    pub param_types: Option<Vec<String>>,

    /// Parameter hints as JSON, e.g. '{"amount":{"min":0,"max":100}}'
    #[arg(long)]
    pub spec: Option<String>,

    /// Maximum number of cases [default: generation.max_cases]
    #[arg(long)]
    pub max_cases: Option<usize>,

    /// Project root for --write
    #[arg(long)]
    pub project_root: Option<PathBuf>,

    /// Write the skeleton below the project's test source root
    #[arg(long, requires = "project_root")]
    pub write: bool,

    /// Replace an existing generated file
    #[arg(long)]
    pub overwrite: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct GenerateTestsArgs {
    /// Signatures JSON produced by the Java source analyzer
    #[arg(value_name = "SIGNATURES")]
    pub signatures: PathBuf,

    /// Maven project root receiving src/test/java files
    #[arg(long)]
    pub project_root: PathBuf,

    /// Replace existing test files
    #[arg(long)]
    pub overwrite: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct SummarizeProjectArgs {
    /// Signatures JSON produced by the Java source analyzer
    #[arg(value_name = "SIGNATURES")]
    pub signatures: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct TestResultsArgs {
    /// Surefire reports directory, usually target/surefire-reports
    #[arg(value_name = "REPORTS_DIR")]
    pub reports_dir: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct InitConfigArgs {
    /// Output configuration file name
    #[arg(short, long, default_value = ".testforge.yml")]
    pub output: PathBuf,

    /// Overwrite existing configuration file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ValidateConfigArgs {
    /// Path to configuration file to validate
    #[arg(value_name = "CONFIG")]
    pub file: PathBuf,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables
    Table,
    /// JSON format output
    Json,
}
