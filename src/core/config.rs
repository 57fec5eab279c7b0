//! Configuration types and management for testforge-rs.
//!
//! The configuration is a plain serde structure persisted as YAML. Every
//! section has a `Default` implementation and a `validate` method; the CLI
//! loads a file when `--config` is given and falls back to defaults otherwise.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, TestforgeError};

/// Main configuration for the synthesis engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestforgeConfig {
    /// Coverage report lookup and thresholds
    #[serde(default)]
    pub coverage: CoverageConfig,

    /// Test input generation settings
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Where and how skeleton files are written
    #[serde(default)]
    pub output: OutputConfig,
}

impl TestforgeConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            TestforgeError::io(format!("Failed to read config file: {}", path.display()), e)
        })?;

        serde_yaml::from_str(&content).map_err(Into::into)
    }

    /// Save configuration to a YAML file
    pub fn to_yaml_file(&self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&path, content).map_err(|e| {
            TestforgeError::io(
                format!("Failed to write config file: {}", path.display()),
                e,
            )
        })
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        self.coverage.validate()?;
        self.generation.validate()?;
        self.output.validate()?;
        Ok(())
    }
}

/// Coverage analysis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageConfig {
    /// Ratio below which classes and methods receive recommendations
    #[serde(default = "default_min_coverage")]
    pub min_coverage: f64,

    /// Report locations tried first, relative to the project root
    #[serde(default = "default_report_paths")]
    pub report_paths: Vec<PathBuf>,

    /// Directory (relative to the project root) searched recursively as a fallback
    #[serde(default = "default_search_root")]
    pub search_root: PathBuf,

    /// File name matched during the recursive search
    #[serde(default = "default_report_file_name")]
    pub report_file_name: String,
}

fn default_min_coverage() -> f64 {
    0.8
}

fn default_report_paths() -> Vec<PathBuf> {
    vec![PathBuf::from("target/site/jacoco/jacoco.xml")]
}

fn default_search_root() -> PathBuf {
    PathBuf::from("target")
}

fn default_report_file_name() -> String {
    "jacoco.xml".to_string()
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            min_coverage: default_min_coverage(),
            report_paths: default_report_paths(),
            search_root: default_search_root(),
            report_file_name: default_report_file_name(),
        }
    }
}

impl CoverageConfig {
    /// Validate coverage configuration
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_coverage) {
            return Err(TestforgeError::config_field(
                format!(
                    "min_coverage must be between 0.0 and 1.0, got {}",
                    self.min_coverage
                ),
                "coverage.min_coverage",
            ));
        }

        if self.report_file_name.trim().is_empty() {
            return Err(TestforgeError::config_field(
                "report_file_name cannot be empty",
                "coverage.report_file_name",
            ));
        }

        Ok(())
    }
}

/// Test input generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Upper bound on generated cases per target method
    #[serde(default = "default_max_cases")]
    pub max_cases: usize,

    /// Character repeated to build `max_length` string candidates
    #[serde(default = "default_string_filler")]
    pub string_filler: char,

    /// Prefix of the "typical" string candidate, followed by the parameter name
    #[serde(default = "default_typical_prefix")]
    pub typical_prefix: String,
}

fn default_max_cases() -> usize {
    20
}

fn default_string_filler() -> char {
    'a'
}

fn default_typical_prefix() -> String {
    "sample_".to_string()
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_cases: default_max_cases(),
            string_filler: default_string_filler(),
            typical_prefix: default_typical_prefix(),
        }
    }
}

impl GenerationConfig {
    /// Validate generation configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_cases == 0 {
            return Err(TestforgeError::config_field(
                "max_cases must be at least 1",
                "generation.max_cases",
            ));
        }

        if self.string_filler.is_control() || self.string_filler == '"' || self.string_filler == '\\' {
            return Err(TestforgeError::config_field(
                format!("string_filler {:?} cannot appear unescaped in a Java literal", self.string_filler),
                "generation.string_filler",
            ));
        }

        Ok(())
    }
}

/// Skeleton output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Test source root relative to the project root
    #[serde(default = "default_test_source_root")]
    pub test_source_root: PathBuf,

    /// Replace existing test files instead of skipping them
    #[serde(default)]
    pub overwrite: bool,

    /// Suffix appended to the class name of whole-class skeletons
    #[serde(default = "default_test_class_suffix")]
    pub test_class_suffix: String,
}

fn default_test_source_root() -> PathBuf {
    PathBuf::from("src/test/java")
}

fn default_test_class_suffix() -> String {
    "Test".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            test_source_root: default_test_source_root(),
            overwrite: false,
            test_class_suffix: default_test_class_suffix(),
        }
    }
}

impl OutputConfig {
    /// Validate output configuration
    pub fn validate(&self) -> Result<()> {
        if self.test_class_suffix.is_empty()
            || !self
                .test_class_suffix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(TestforgeError::config_field(
                format!(
                    "test_class_suffix must be a non-empty Java identifier fragment, got '{}'",
                    self.test_class_suffix
                ),
                "output.test_class_suffix",
            ));
        }
        Ok(())
    }
}
