//! Error types for the testforge-rs library.
//!
//! Every fallible operation returns [`Result`], whose error side is the
//! structured [`TestforgeError`]. Report lookup, report parsing and target
//! resolution each have their own variant so callers can tell "no report yet"
//! apart from "the report is broken".

use std::io;

use thiserror::Error;

/// Main result type for testforge operations.
pub type Result<T> = std::result::Result<T, TestforgeError>;

/// Guidance attached to a missing coverage report.
pub const REPORT_GUIDANCE: &str =
    "Make sure you ran `mvn test` or `mvn verify` with the JaCoCo plugin enabled.";

/// Error type for all testforge operations.
#[derive(Error, Debug)]
pub enum TestforgeError {
    /// I/O related errors (file operations)
    #[error("I/O error: {message}")]
    Io {
        /// Human-readable error message
        message: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        /// Error description
        message: String,
        /// Configuration field that caused the error
        field: Option<String>,
    },

    /// No coverage report could be located
    #[error("Could not find {file_name} under {searched_root}. {guidance}")]
    ReportNotFound {
        /// Directory that was searched
        searched_root: String,
        /// Report file name that was looked for
        file_name: String,
        /// What the caller should do to produce the report
        guidance: String,
    },

    /// Malformed report documents
    #[error("Parse error in {format} report: {message}")]
    Parse {
        /// Report format being parsed (jacoco, surefire, ...)
        format: String,
        /// Error description
        message: String,
        /// File path where error occurred
        file_path: Option<String>,
    },

    /// Requested test target does not exist in the signature set
    #[error("Could not resolve method '{method}' in class '{class_fqn}'")]
    Resolution {
        /// Fully qualified class name that was requested
        class_fqn: String,
        /// Method name that was requested
        method: String,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error description
        message: String,
        /// Data type being serialized
        data_type: Option<String>,
        /// Underlying serialization error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors for input data
    #[error("Validation error: {message}")]
    Validation {
        /// Error description
        message: String,
        /// Field or input that failed validation
        field: Option<String>,
    },
}

impl TestforgeError {
    /// Create a new I/O error with context
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: None,
        }
    }

    /// Create a new configuration error with field context
    pub fn config_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a "report not found" error carrying the standard guidance
    pub fn report_not_found(searched_root: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self::ReportNotFound {
            searched_root: searched_root.into(),
            file_name: file_name.into(),
            guidance: REPORT_GUIDANCE.to_string(),
        }
    }

    /// Create a new parse error
    pub fn parse(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            format: format.into(),
            message: message.into(),
            file_path: None,
        }
    }

    /// Create a resolution failure for a class/method pair
    pub fn resolution(class_fqn: impl Into<String>, method: impl Into<String>) -> Self {
        Self::Resolution {
            class_fqn: class_fqn.into(),
            method: method.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a new validation error naming the offending field
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Attach a file path to a parse error; other variants are returned unchanged.
    pub fn in_file(mut self, path: impl Into<String>) -> Self {
        if let Self::Parse { file_path, .. } = &mut self {
            *file_path = Some(path.into());
        }
        self
    }

    /// True when the error means "no report has been produced yet".
    pub fn is_report_not_found(&self) -> bool {
        matches!(self, Self::ReportNotFound { .. })
    }
}

impl From<io::Error> for TestforgeError {
    fn from(err: io::Error) -> Self {
        Self::io("I/O operation failed", err)
    }
}

impl From<serde_json::Error> for TestforgeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: format!("JSON serialization failed: {err}"),
            data_type: Some("JSON".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_yaml::Error> for TestforgeError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization {
            message: format!("YAML serialization failed: {err}"),
            data_type: Some("YAML".to_string()),
            source: Some(Box::new(err)),
        }
    }
}
