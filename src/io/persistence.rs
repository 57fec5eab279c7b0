//! Placement and writing of generated Java test files.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::config::OutputConfig;
use crate::core::errors::{Result, TestforgeError};

/// What happened to a target file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "path", rename_all = "lowercase")]
pub enum WriteOutcome {
    Written(PathBuf),
    /// The file existed and overwriting was disabled
    Skipped(PathBuf),
}

impl WriteOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Written(path) | Self::Skipped(path) => path,
        }
    }

    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written(_))
    }
}

/// Writes test sources below a project's test source root
#[derive(Debug, Clone)]
pub struct TestFileWriter {
    test_root: PathBuf,
    overwrite: bool,
}

impl TestFileWriter {
    pub fn new(project_root: &Path, config: &OutputConfig) -> Self {
        Self {
            test_root: project_root.join(&config.test_source_root),
            overwrite: config.overwrite,
        }
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn test_root(&self) -> &Path {
        &self.test_root
    }

    /// `<test root>/<package as directories>/<class name>.java`
    pub fn target_path(&self, package: &str, class_name: &str) -> PathBuf {
        let mut path = self.test_root.clone();
        path.extend(package.split('.').filter(|segment| !segment.is_empty()));
        path.join(format!("{class_name}.java"))
    }

    /// Write `content` for the given test class unless it exists and overwriting is off.
    pub fn write(&self, package: &str, class_name: &str, content: &str) -> Result<WriteOutcome> {
        let path = self.target_path(package, class_name);

        if path.exists() && !self.overwrite {
            debug!("Keeping existing test file {}", path.display());
            return Ok(WriteOutcome::Skipped(path));
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                TestforgeError::io(
                    format!("Failed to create test directory {}", parent.display()),
                    err,
                )
            })?;
        }

        fs::write(&path, content).map_err(|err| {
            TestforgeError::io(format!("Failed to write test file {}", path.display()), err)
        })?;

        info!("Wrote {}", path.display());
        Ok(WriteOutcome::Written(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn writer(root: &Path) -> TestFileWriter {
        TestFileWriter::new(root, &OutputConfig::default())
    }

    #[test]
    fn maps_package_to_directories() {
        let tmp = TempDir::new().unwrap();
        let path = writer(tmp.path()).target_path("com.shop", "CartTest");
        assert_eq!(path, tmp.path().join("src/test/java/com/shop/CartTest.java"));

        let path = writer(tmp.path()).target_path("", "CartTest");
        assert_eq!(path, tmp.path().join("src/test/java/CartTest.java"));
    }

    #[test]
    fn skips_existing_files_unless_overwriting() {
        let tmp = TempDir::new().unwrap();
        let writer = writer(tmp.path());

        let first = writer.write("com.shop", "CartTest", "first").unwrap();
        assert!(first.is_written());

        let second = writer.write("com.shop", "CartTest", "second").unwrap();
        assert_eq!(second, WriteOutcome::Skipped(first.path().to_path_buf()));
        assert_eq!(fs::read_to_string(first.path()).unwrap(), "first");

        let third = writer
            .with_overwrite(true)
            .write("com.shop", "CartTest", "third")
            .unwrap();
        assert!(third.is_written());
        assert_eq!(fs::read_to_string(third.path()).unwrap(), "third");
    }

    #[test]
    fn outcome_serializes_with_status() {
        let json = serde_json::to_value(WriteOutcome::Skipped(PathBuf::from("A.java"))).unwrap();
        assert_eq!(json, serde_json::json!({"status": "skipped", "path": "A.java"}));
    }
}
