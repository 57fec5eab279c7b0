//! Value-class generation for individual parameters.
//!
//! Each declared Java type is classified into a closed set of value classes,
//! then turned into an ordered list of labelled boundary and equivalence
//! candidates.

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::core::config::GenerationConfig;
use crate::synthesis::params::ParamSpec;

/// Candidates kept per parameter before expansion.
pub const MAX_CANDIDATES_PER_PARAMETER: usize = 6;

/// Numeric Java types the generator understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericKind {
    Int,
    Long,
    Short,
    Byte,
    Double,
    Float,
}

impl NumericKind {
    pub fn is_integral(self) -> bool {
        !matches!(self, Self::Double | Self::Float)
    }
}

/// Value class of a declared parameter type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "class", content = "kind", rename_all = "lowercase")]
pub enum TypeClass {
    Numeric(NumericKind),
    Text,
    Unsupported,
}

impl TypeClass {
    /// Classify a declared type name, ignoring case and surrounding whitespace.
    pub fn classify(type_name: &str) -> Self {
        match type_name.trim().to_ascii_lowercase().as_str() {
            "int" | "integer" => Self::Numeric(NumericKind::Int),
            "long" => Self::Numeric(NumericKind::Long),
            "short" => Self::Numeric(NumericKind::Short),
            "byte" => Self::Numeric(NumericKind::Byte),
            "double" => Self::Numeric(NumericKind::Double),
            "float" => Self::Numeric(NumericKind::Float),
            "string" => Self::Text,
            _ => Self::Unsupported,
        }
    }
}

/// Category a candidate value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CandidateKind {
    BoundaryInvalidLow,
    BoundaryValid,
    BoundaryValidMiddle,
    BoundaryInvalidHigh,
    EquivalenceNegative,
    EquivalenceZero,
    EquivalencePositive,
    EquivalenceEmpty,
    EquivalenceTypical,
    BoundaryMaxLength,
    EquivalenceNull,
    EquivalenceDefault,
}

impl CandidateKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BoundaryInvalidLow => "boundary-invalid-low",
            Self::BoundaryValid => "boundary-valid",
            Self::BoundaryValidMiddle => "boundary-valid-middle",
            Self::BoundaryInvalidHigh => "boundary-invalid-high",
            Self::EquivalenceNegative => "equivalence-negative",
            Self::EquivalenceZero => "equivalence-zero",
            Self::EquivalencePositive => "equivalence-positive",
            Self::EquivalenceEmpty => "equivalence-empty",
            Self::EquivalenceTypical => "equivalence-typical",
            Self::BoundaryMaxLength => "boundary-max-length",
            Self::EquivalenceNull => "equivalence-null",
            Self::EquivalenceDefault => "equivalence-default",
        }
    }
}

impl fmt::Display for CandidateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Concrete value carried by a candidate; serializes as a plain JSON scalar
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateValue {
    Null,
    Int(i64),
    Float(f64),
    /// Shared so cloning into every case stays cheap
    Text(Arc<str>),
}

impl CandidateValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl Serialize for CandidateValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Int(value) => serializer.serialize_i64(*value),
            Self::Float(value) => serializer.serialize_f64(*value),
            Self::Text(value) => serializer.serialize_str(value),
        }
    }
}

/// A labelled representative value for one parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueCandidate {
    pub label: &'static str,
    pub value: CandidateValue,
    pub kind: CandidateKind,
}

impl ValueCandidate {
    pub fn new(label: &'static str, value: CandidateValue, kind: CandidateKind) -> Self {
        Self { label, value, kind }
    }
}

/// Produce the candidate list for one parameter.
///
/// The list is returned in generation order and is not truncated; see
/// [`truncate_candidates`].
pub fn generate_candidates(
    name: &str,
    type_name: &str,
    spec: Option<&ParamSpec>,
    config: &GenerationConfig,
) -> Vec<ValueCandidate> {
    match TypeClass::classify(type_name) {
        TypeClass::Numeric(kind) => numeric_candidates(name, kind, spec),
        TypeClass::Text => text_candidates(name, spec, config),
        TypeClass::Unsupported => {
            debug!("Type '{}' of parameter '{}' has no value model", type_name, name);
            vec![ValueCandidate::new(
                "default",
                CandidateValue::Null,
                CandidateKind::EquivalenceDefault,
            )]
        }
    }
}

/// Keep the first [`MAX_CANDIDATES_PER_PARAMETER`] candidates in order.
pub fn truncate_candidates(mut candidates: Vec<ValueCandidate>) -> Vec<ValueCandidate> {
    candidates.truncate(MAX_CANDIDATES_PER_PARAMETER);
    candidates
}

fn numeric_candidates(name: &str, kind: NumericKind, spec: Option<&ParamSpec>) -> Vec<ValueCandidate> {
    let bounds = spec.and_then(|spec| {
        let bounds = spec.usable_bounds();
        if bounds.is_none() && (spec.min.is_some() || spec.max.is_some()) {
            debug!(
                "Ignoring bounds {:?}..{:?} for '{}'; need min < max",
                spec.min, spec.max, name
            );
        }
        bounds
    });

    match bounds {
        Some((min, max)) if kind.is_integral() => match integral_bounds(min, max) {
            Some((min, max)) => bounded_integral(min, max),
            None => {
                debug!("Ignoring fractional bounds {}..{} for integral '{}'", min, max, name);
                unbounded(kind)
            }
        },
        Some((min, max)) => bounded_floating(min, max),
        None => unbounded(kind),
    }
}

fn integral_bounds(min: f64, max: f64) -> Option<(i64, i64)> {
    let to_i64 = |value: f64| {
        (value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64)
            .then_some(value as i64)
    };
    Some((to_i64(min)?, to_i64(max)?))
}

fn bounded_integral(min: i64, max: i64) -> Vec<ValueCandidate> {
    let mid = (i128::from(min) + i128::from(max)).div_euclid(2) as i64;
    bounded([
        CandidateValue::Int(min.saturating_sub(1)),
        CandidateValue::Int(min),
        CandidateValue::Int(min.saturating_add(1)),
        CandidateValue::Int(mid),
        CandidateValue::Int(max.saturating_sub(1)),
        CandidateValue::Int(max),
        CandidateValue::Int(max.saturating_add(1)),
    ])
}

fn bounded_floating(min: f64, max: f64) -> Vec<ValueCandidate> {
    bounded([
        CandidateValue::Float(min - 1.0),
        CandidateValue::Float(min),
        CandidateValue::Float(min + 1.0),
        CandidateValue::Float(((min + max) / 2.0).floor()),
        CandidateValue::Float(max - 1.0),
        CandidateValue::Float(max),
        CandidateValue::Float(max + 1.0),
    ])
}

fn bounded(values: [CandidateValue; 7]) -> Vec<ValueCandidate> {
    const SHAPE: [(&str, CandidateKind); 7] = [
        ("below_min", CandidateKind::BoundaryInvalidLow),
        ("at_min", CandidateKind::BoundaryValid),
        ("just_above_min", CandidateKind::BoundaryValid),
        ("mid_range", CandidateKind::BoundaryValidMiddle),
        ("just_below_max", CandidateKind::BoundaryValid),
        ("at_max", CandidateKind::BoundaryValid),
        ("above_max", CandidateKind::BoundaryInvalidHigh),
    ];

    SHAPE
        .into_iter()
        .zip(values)
        .map(|((label, kind), value)| ValueCandidate::new(label, value, kind))
        .collect()
}

fn unbounded(kind: NumericKind) -> Vec<ValueCandidate> {
    let value = |n: i64| {
        if kind.is_integral() {
            CandidateValue::Int(n)
        } else {
            CandidateValue::Float(n as f64)
        }
    };

    vec![
        ValueCandidate::new("negative", value(-1), CandidateKind::EquivalenceNegative),
        ValueCandidate::new("zero", value(0), CandidateKind::EquivalenceZero),
        ValueCandidate::new("positive", value(1), CandidateKind::EquivalencePositive),
    ]
}

fn text_candidates(name: &str, spec: Option<&ParamSpec>, config: &GenerationConfig) -> Vec<ValueCandidate> {
    let mut candidates = vec![
        ValueCandidate::new(
            "empty",
            CandidateValue::Text(Arc::from("")),
            CandidateKind::EquivalenceEmpty,
        ),
        ValueCandidate::new(
            "typical",
            CandidateValue::Text(format!("{}{}", config.typical_prefix, name).into()),
            CandidateKind::EquivalenceTypical,
        ),
    ];

    if let Some(len) = spec.and_then(ParamSpec::positive_max_length) {
        let filled: String = std::iter::repeat(config.string_filler).take(len).collect();
        candidates.push(ValueCandidate::new(
            "max_length",
            CandidateValue::Text(filled.into()),
            CandidateKind::BoundaryMaxLength,
        ));
    }

    if spec.is_some_and(|spec| spec.allow_null) {
        candidates.push(ValueCandidate::new(
            "null",
            CandidateValue::Null,
            CandidateKind::EquivalenceNull,
        ));
    }

    candidates
}
