//! Capped cartesian expansion of per-parameter candidates.
//!
//! [`CaseSpace::cases`] walks the product lazily in depth-first order: the
//! first parameter varies slowest, the last fastest, and candidates appear in
//! list order. Nothing beyond what the caller consumes is materialized.

use indexmap::IndexMap;
use serde::Serialize;

use crate::synthesis::values::{CandidateKind, CandidateValue, ValueCandidate};

/// Origin of a chosen value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseOrigin {
    pub label: &'static str,
    pub kind: CandidateKind,
}

/// One generated input combination
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestCase {
    /// 1-based position in expansion order
    pub index: usize,
    pub values: IndexMap<String, CandidateValue>,
    pub origins: IndexMap<String, CaseOrigin>,
}

/// Candidate lists in declared parameter order
#[derive(Debug, Clone, Default)]
pub struct CaseSpace<'a> {
    parameters: Vec<(&'a str, &'a [ValueCandidate])>,
}

impl<'a> CaseSpace<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the next parameter in declared order.
    pub fn with_parameter(mut self, name: &'a str, candidates: &'a [ValueCandidate]) -> Self {
        self.parameters.push((name, candidates));
        self
    }

    pub fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    /// Size of the full product, saturating; zero with no parameters.
    pub fn product_size(&self) -> usize {
        if self.parameters.is_empty() {
            return 0;
        }
        self.parameters
            .iter()
            .fold(1usize, |acc, (_, candidates)| acc.saturating_mul(candidates.len()))
    }

    /// Lazy iterator over every combination. Restartable: each call begins anew.
    pub fn cases(&self) -> Cases<'_, 'a> {
        let exhausted = self.parameters.is_empty()
            || self.parameters.iter().any(|(_, candidates)| candidates.is_empty());
        Cases {
            space: self,
            cursor: vec![0; self.parameters.len()],
            next_index: 1,
            exhausted,
        }
    }

    /// The first `max_cases` combinations.
    pub fn expand(&self, max_cases: usize) -> Vec<TestCase> {
        self.cases().take(max_cases).collect()
    }
}

/// Odometer over a [`CaseSpace`]
#[derive(Debug, Clone)]
pub struct Cases<'s, 'a> {
    space: &'s CaseSpace<'a>,
    cursor: Vec<usize>,
    next_index: usize,
    exhausted: bool,
}

impl Cases<'_, '_> {
    fn advance(&mut self) {
        for (position, (_, candidates)) in self.space.parameters.iter().enumerate().rev() {
            self.cursor[position] += 1;
            if self.cursor[position] < candidates.len() {
                return;
            }
            self.cursor[position] = 0;
        }
        self.exhausted = true;
    }
}

impl Iterator for Cases<'_, '_> {
    type Item = TestCase;

    fn next(&mut self) -> Option<TestCase> {
        if self.exhausted {
            return None;
        }

        let mut values = IndexMap::with_capacity(self.cursor.len());
        let mut origins = IndexMap::with_capacity(self.cursor.len());
        for (&choice, (name, candidates)) in self.cursor.iter().zip(&self.space.parameters) {
            let candidate = &candidates[choice];
            values.insert(name.to_string(), candidate.value.clone());
            origins.insert(
                name.to_string(),
                CaseOrigin {
                    label: candidate.label,
                    kind: candidate.kind,
                },
            );
        }

        let case = TestCase {
            index: self.next_index,
            values,
            origins,
        };
        self.next_index += 1;
        self.advance();
        Some(case)
    }
}
