//! Coverage report discovery.
//!
//! Looks for a JaCoCo XML report beneath a Maven-style project root: the
//! configured report paths first, then a recursive search of the build
//! directory. A missing report is surfaced as
//! [`TestforgeError::ReportNotFound`], never as a parse failure.

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::core::config::CoverageConfig;
use crate::core::errors::{Result, TestforgeError};

/// Coverage report discovery utility
pub struct CoverageDiscovery;

impl CoverageDiscovery {
    /// Locate the coverage report for a project root.
    pub fn locate_report(project_root: &Path, config: &CoverageConfig) -> Result<PathBuf> {
        Self::find_report(project_root, config).ok_or_else(|| {
            TestforgeError::report_not_found(
                project_root.display().to_string(),
                config.report_file_name.clone(),
            )
        })
    }

    /// Same lookup as [`Self::locate_report`], returning `None` when nothing matches.
    pub fn find_report(project_root: &Path, config: &CoverageConfig) -> Option<PathBuf> {
        for candidate in &config.report_paths {
            let path = project_root.join(candidate);
            if path.is_file() {
                debug!("Using configured coverage report: {}", path.display());
                return Some(path);
            }
        }

        let search_root = project_root.join(&config.search_root);
        if !search_root.is_dir() {
            debug!("Search root does not exist: {}", search_root.display());
            return None;
        }

        let found = WalkDir::new(&search_root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .find(|entry| {
                entry.file_type().is_file()
                    && entry.file_name().to_str() == Some(config.report_file_name.as_str())
            })
            .map(|entry| entry.into_path());

        if let Some(path) = &found {
            info!("Discovered coverage report: {}", path.display());
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "<report name=\"demo\"/>").unwrap();
    }

    #[test]
    fn prefers_the_standard_maven_location() {
        let dir = TempDir::new().unwrap();
        let standard = dir.path().join("target/site/jacoco/jacoco.xml");
        let other = dir.path().join("target/aaa/jacoco.xml");
        touch(&standard);
        touch(&other);

        let found = CoverageDiscovery::locate_report(dir.path(), &CoverageConfig::default()).unwrap();
        assert_eq!(found, standard);
    }

    #[test]
    fn falls_back_to_recursive_search_in_sorted_order() {
        let dir = TempDir::new().unwrap();
        let second = dir.path().join("target/reports/b/jacoco.xml");
        let first = dir.path().join("target/reports/a/jacoco.xml");
        touch(&second);
        touch(&first);

        let found = CoverageDiscovery::locate_report(dir.path(), &CoverageConfig::default()).unwrap();
        assert_eq!(found, first);
    }

    #[test]
    fn missing_report_is_not_found_with_guidance() {
        let dir = TempDir::new().unwrap();
        let err = CoverageDiscovery::locate_report(dir.path(), &CoverageConfig::default())
            .unwrap_err();

        assert!(err.is_report_not_found());
        assert!(err.to_string().contains("mvn test"));
    }

    #[test]
    fn honours_custom_file_name() {
        let dir = TempDir::new().unwrap();
        let custom = dir.path().join("target/cov/merged.xml");
        touch(&custom);

        let config = CoverageConfig {
            report_file_name: "merged.xml".to_string(),
            ..CoverageConfig::default()
        };
        assert_eq!(CoverageDiscovery::find_report(dir.path(), &config), Some(custom));
    }
}
