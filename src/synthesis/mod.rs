//! Test input synthesis.
//!
//! A resolved method flows through [`values`] (candidates per parameter),
//! [`combinations`] (capped cartesian product) and [`skeleton`] (JUnit source).
//! [`orchestration`] wires these together.

pub mod combinations;
pub mod orchestration;
pub mod params;
pub mod skeleton;
pub mod values;

pub use combinations::{CaseOrigin, CaseSpace, TestCase};
pub use orchestration::{
    generate_junit_tests, generate_spec_based_tests, JunitGenerationResult, ParameterDescriptor,
    SpecGenerationRequest, SpecGenerationResult, TargetDescriptor,
};
pub use params::{parse_param_specs, ParamSpec, ParsedParamSpecs};
pub use values::{
    generate_candidates, truncate_candidates, CandidateKind, CandidateValue, TypeClass,
    ValueCandidate, MAX_CANDIDATES_PER_PARAMETER,
};
