//! CLI Command Implementations
//!
//! - config: configuration management commands
//! - coverage: coverage analysis and gate
//! - generate: case and skeleton generation, project summary
//! - mcp: MCP server command
//! - results: Surefire result summary

pub mod config;
pub mod coverage;
pub mod generate;
pub mod mcp;
pub mod results;

pub use config::{init_config, load_configuration, print_default_config, validate_config};
pub use coverage::{analyze_coverage_command, coverage_gate_command};
pub use generate::{generate_cases_command, generate_tests_command, summarize_project_command};
pub use mcp::mcp_stdio_command;
pub use results::test_results_command;
