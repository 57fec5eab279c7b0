//! Configuration management commands.

use std::path::Path;

use owo_colors::OwoColorize;
use tabled::{settings::Style as TableStyle, Table, Tabled};

use crate::cli::args::{InitConfigArgs, ValidateConfigArgs};
use testforge_rs::core::config::TestforgeConfig;

/// Load configuration from a YAML file, or defaults when no file is given.
pub fn load_configuration(path: Option<&Path>) -> anyhow::Result<TestforgeConfig> {
    let config = match path {
        Some(path) => TestforgeConfig::from_yaml_file(path)?,
        None => TestforgeConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Print default configuration in YAML format
pub async fn print_default_config() -> anyhow::Result<()> {
    println!("{}", "# Default testforge configuration".dimmed());
    println!("{}", "# Save this to a file and customize as needed".dimmed());
    println!(
        "{}",
        "# Usage: testforge --config your-config.yml analyze-coverage <project>".dimmed()
    );
    println!();

    let yaml_output = serde_yaml::to_string(&TestforgeConfig::default())?;
    println!("{}", yaml_output);

    Ok(())
}

/// Initialize a configuration file with defaults
pub async fn init_config(args: InitConfigArgs) -> anyhow::Result<()> {
    if args.output.exists() && !args.force {
        return Err(anyhow::anyhow!(
            "Configuration file already exists: {}. Use --force to overwrite or choose a different name with --output",
            args.output.display()
        ));
    }

    let yaml_content = serde_yaml::to_string(&TestforgeConfig::default())?;
    tokio::fs::write(&args.output, yaml_content).await?;

    println!(
        "{} {}",
        "✅ Configuration saved to:".bright_green().bold(),
        args.output.display().to_string().cyan()
    );
    println!();
    println!("{}", "🔧 Key settings you can customize:".bright_blue().bold());

    /// Row type for the configuration tips table.
    #[derive(Tabled)]
    struct CustomizationRow {
        setting: &'static str,
        description: &'static str,
    }

    let rows = vec![
        CustomizationRow {
            setting: "coverage.min_coverage",
            description: "Ratio below which guidance is produced (default: 0.8)",
        },
        CustomizationRow {
            setting: "coverage.report_paths",
            description: "Where to look for jacoco.xml first",
        },
        CustomizationRow {
            setting: "generation.max_cases",
            description: "Cap on generated cases per method (default: 20)",
        },
        CustomizationRow {
            setting: "generation.typical_prefix",
            description: "Prefix of typical string values (default: sample_)",
        },
        CustomizationRow {
            setting: "output.test_source_root",
            description: "Where skeletons are written (default: src/test/java)",
        },
        CustomizationRow {
            setting: "output.overwrite",
            description: "Replace existing test files (default: false)",
        },
    ];

    let mut table = Table::new(rows);
    table.with(TableStyle::rounded());
    println!("{}", table);

    Ok(())
}

/// Validate a testforge configuration file
pub async fn validate_config(args: ValidateConfigArgs) -> anyhow::Result<()> {
    println!(
        "{} {}",
        "🔍 Validating configuration:".bright_blue().bold(),
        args.file.display().to_string().cyan()
    );
    println!();

    let config = match load_configuration(Some(&args.file)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "❌ Configuration validation failed:".red(), e);
            println!();
            println!(
                "{}",
                "💡 Tip: Use 'testforge print-default-config' to see valid format".dimmed()
            );
            return Err(anyhow::anyhow!("Configuration validation failed: {}", e));
        }
    };

    println!("{}", "✅ Configuration file is valid!".bright_green().bold());
    println!();

    #[derive(Tabled)]
    struct DetailRow {
        setting: &'static str,
        value: String,
    }

    let rows = vec![
        DetailRow {
            setting: "coverage.min_coverage",
            value: config.coverage.min_coverage.to_string(),
        },
        DetailRow {
            setting: "coverage.report_file_name",
            value: config.coverage.report_file_name.clone(),
        },
        DetailRow {
            setting: "generation.max_cases",
            value: config.generation.max_cases.to_string(),
        },
        DetailRow {
            setting: "output.test_source_root",
            value: config.output.test_source_root.display().to_string(),
        },
        DetailRow {
            setting: "output.overwrite",
            value: config.output.overwrite.to_string(),
        },
    ];

    let mut table = Table::new(rows);
    table.with(TableStyle::rounded());
    println!("{}", table);

    Ok(())
}
