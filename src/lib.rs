//! # Testforge-RS: Coverage-Driven Test Synthesis for Java Projects
//!
//! Reads JaCoCo coverage reports and analyzer-produced method signatures, and
//! proposes test inputs and JUnit 5 skeletons:
//!
//! - **Coverage analysis**: per-class and per-method ratios, uncovered line
//!   ranges and improvement guidance, worst-covered classes first
//! - **Boundary-value synthesis**: labelled boundary and equivalence candidates
//!   per parameter, expanded into a capped, deterministic set of cases
//! - **Skeleton rendering**: one JUnit stub per case or per public method, each
//!   ending in an explicit "not yet implemented" failure
//! - **Surefire results**: suite and case outcomes from `TEST-*.xml` files
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                 API Layer (TestforgeEngine)                   │
//! ├───────────────────────────────────────────────────────────────┤
//! │  Core          │  Detectors       │  Synthesis    │  I/O      │
//! │ • Config       │ • JaCoCo reader  │ • Values      │ • Test    │
//! │ • Errors       │ • Ranges         │ • Params      │   file    │
//! │ • Signatures   │ • Heuristics     │ • Cases       │   writer  │
//! │ • Discovery    │ • Surefire       │ • Skeletons   │           │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use testforge_rs::{SpecGenerationRequest, TestforgeConfig, TestforgeEngine};
//! use testforge_rs::core::signatures::load_signatures;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = TestforgeEngine::new(TestforgeConfig::default())?;
//!
//!     let coverage = engine.analyze_coverage(Path::new("."), None)?;
//!     println!("{} classes analyzed", coverage.analysis.classes.len());
//!
//!     let classes = load_signatures(Path::new("signatures.json"))?;
//!     let request = SpecGenerationRequest::new("com.shop.PriceCalculator", "applyDiscount")
//!         .with_spec(r#"{"amount":{"min":0,"max":100}}"#);
//!     let generated = engine.generate_spec_based_tests(&classes, &request)?;
//!     println!("{}", generated.skeleton);
//!     Ok(())
//! }
//! ```

#![warn(unsafe_code)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

#[cfg(feature = "mimalloc")]
#[global_allocator]
static ALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;

// Configuration, errors and inputs
pub mod core {
    //! Configuration, error types and externally produced inputs.

    pub mod config;
    pub mod coverage_discovery;
    pub mod errors;
    pub mod signatures;
}

// Report readers
pub mod detectors {
    //! Readers for build-tool reports.

    pub mod coverage;
    pub mod surefire;
}

// Test input generation
pub mod synthesis;

// File output
pub mod io {
    //! File-system output for generated test sources.
    //!
    //! Writes are guarded only by an existence check. Concurrent writers
    //! targeting the same file must be serialized by the caller.

    pub mod persistence;
}

// Public API and engine interface
pub mod api {
    //! High-level engine interface.

    pub mod engine;
}

// Re-export primary types for convenience
pub use api::engine::{CoverageResult, GateResult, TestforgeEngine};
pub use core::config::TestforgeConfig;
pub use core::errors::{Result, TestforgeError};
pub use synthesis::orchestration::{SpecGenerationRequest, SpecGenerationResult};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
