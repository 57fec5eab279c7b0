//! End-to-end generation pipelines.
//!
//! Spec-based generation: resolve target, build candidates per parameter,
//! truncate, expand under the cap, render. Whole-class generation renders one
//! skeleton per class with public methods and hands it to the file writer.

use serde::Serialize;
use tracing::{debug, info};

use crate::core::config::GenerationConfig;
use crate::core::errors::Result;
use crate::core::signatures::{resolve_target, summarize, ClassSignature, ProjectSummary};
use crate::io::persistence::{TestFileWriter, WriteOutcome};
use crate::synthesis::combinations::{CaseSpace, TestCase};
use crate::synthesis::params::parse_param_specs;
use crate::synthesis::skeleton::{
    generated_test_class_name, render_case_class, render_class_skeleton, test_class_name,
};
use crate::synthesis::values::{generate_candidates, truncate_candidates, ValueCandidate};

/// What to generate cases for
#[derive(Debug, Clone, Default)]
pub struct SpecGenerationRequest {
    pub class_fqn: String,
    pub method: String,
    /// Exact parameter types selecting an overload
    pub parameter_types: Option<Vec<String>>,
    /// Raw JSON parameter hints
    pub spec: Option<String>,
    /// Overrides the configured cap; zero yields no cases
    pub max_cases: Option<usize>,
}

impl SpecGenerationRequest {
    pub fn new(class_fqn: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            class_fqn: class_fqn.into(),
            method: method.into(),
            ..Self::default()
        }
    }

    pub fn with_spec(mut self, spec: impl Into<String>) -> Self {
        self.spec = Some(spec.into());
        self
    }

    pub fn with_max_cases(mut self, max_cases: usize) -> Self {
        self.max_cases = Some(max_cases);
        self
    }

    pub fn with_parameter_types(mut self, types: Vec<String>) -> Self {
        self.parameter_types = Some(types);
        self
    }
}

/// A target parameter with the candidates used for it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub candidates: Vec<ValueCandidate>,
}

/// The resolved method under test
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetDescriptor {
    pub class_fqn: String,
    pub package: String,
    pub class_name: String,
    pub method: String,
    pub return_type: Option<String>,
    pub is_static: bool,
    pub is_constructor: bool,
    pub parameters: Vec<ParameterDescriptor>,
}

/// Output of spec-based generation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecGenerationResult {
    pub target: TargetDescriptor,
    pub max_cases: usize,
    pub test_cases: Vec<TestCase>,
    /// Class name declared by `skeleton`
    pub test_class_name: String,
    pub skeleton: String,
    /// Why the parameter hints were partly or wholly ignored
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec_warning: Option<String>,
}

/// Generate boundary and equivalence cases for one method.
///
/// Fails only when the class or method cannot be resolved; malformed hints
/// degrade to the no-bounds heuristics and surface as `spec_warning`.
pub fn generate_spec_based_tests(
    classes: &[ClassSignature],
    request: &SpecGenerationRequest,
    config: &GenerationConfig,
) -> Result<SpecGenerationResult> {
    let target = resolve_target(
        classes,
        &request.class_fqn,
        &request.method,
        request.parameter_types.as_deref(),
    )?;
    let hints = parse_param_specs(request.spec.as_deref());
    let max_cases = request.max_cases.unwrap_or(config.max_cases);

    let parameters: Vec<ParameterDescriptor> = target
        .method
        .parameters
        .iter()
        .map(|param| ParameterDescriptor {
            name: param.name.clone(),
            type_name: param.type_name.clone(),
            candidates: truncate_candidates(generate_candidates(
                &param.name,
                &param.type_name,
                hints.get(&param.name),
                config,
            )),
        })
        .collect();

    let space = parameters
        .iter()
        .fold(CaseSpace::new(), |space, param| {
            space.with_parameter(&param.name, &param.candidates)
        });
    let test_cases = space.expand(max_cases);
    if space.product_size() > test_cases.len() {
        debug!(
            "Capped {}#{} at {} of {} combinations",
            request.class_fqn,
            request.method,
            test_cases.len(),
            space.product_size()
        );
    }

    let skeleton = render_case_class(target.class, target.method, &test_cases);
    info!(
        "Generated {} cases for {}#{}",
        test_cases.len(),
        request.class_fqn,
        request.method
    );

    Ok(SpecGenerationResult {
        target: TargetDescriptor {
            class_fqn: target.class.fqn(),
            package: target.class.package.clone(),
            class_name: target.class.class_name.clone(),
            method: target.method.name.clone(),
            return_type: target.method.return_type.clone(),
            is_static: target.method.is_static,
            is_constructor: target.method.is_constructor,
            parameters,
        },
        max_cases,
        test_cases,
        test_class_name: generated_test_class_name(target.class, target.method),
        skeleton,
        spec_warning: hints.warning,
    })
}

/// Files produced by whole-class generation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JunitGenerationResult {
    pub generated_files: Vec<String>,
    pub skipped_files: Vec<String>,
    pub summary: ProjectSummary,
}

/// Render and write a skeleton for every class with at least one public method.
pub fn generate_junit_tests(
    classes: &[ClassSignature],
    writer: &TestFileWriter,
    test_class_suffix: &str,
) -> Result<JunitGenerationResult> {
    let mut result = JunitGenerationResult {
        summary: summarize(classes),
        ..JunitGenerationResult::default()
    };

    for class in classes.iter().filter(|class| class.has_public_methods()) {
        let source = render_class_skeleton(class, test_class_suffix);
        let outcome = writer.write(
            &class.package,
            &test_class_name(class, test_class_suffix),
            &source,
        )?;
        let path = outcome.path().display().to_string();
        match outcome {
            WriteOutcome::Written(_) => result.generated_files.push(path),
            WriteOutcome::Skipped(_) => result.skipped_files.push(path),
        }
    }

    info!(
        "Generated {} test classes, skipped {}",
        result.generated_files.len(),
        result.skipped_files.len()
    );
    Ok(result)
}
