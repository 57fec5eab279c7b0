use serde::{Deserialize, Serialize};

/// JaCoCo counter categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CounterKind {
    Instruction,
    Branch,
    Line,
    Complexity,
    Method,
    Class,
}

impl CounterKind {
    /// Parse the `type` attribute of a `<counter>` element.
    pub fn from_report_name(name: &str) -> Option<Self> {
        match name {
            "INSTRUCTION" => Some(Self::Instruction),
            "BRANCH" => Some(Self::Branch),
            "LINE" => Some(Self::Line),
            "COMPLEXITY" => Some(Self::Complexity),
            "METHOD" => Some(Self::Method),
            "CLASS" => Some(Self::Class),
            _ => None,
        }
    }
}

/// A single missed/covered counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageCounter {
    pub kind: CounterKind,
    pub missed: u64,
    pub covered: u64,
}

impl CoverageCounter {
    pub fn new(kind: CounterKind, missed: u64, covered: u64) -> Self {
        Self {
            kind,
            missed,
            covered,
        }
    }

    /// Counter for an element that has no matching child counter.
    pub fn empty(kind: CounterKind) -> Self {
        Self::new(kind, 0, 0)
    }

    pub fn total(&self) -> u64 {
        self.missed.saturating_add(self.covered)
    }

    /// covered / (missed + covered), 0.0 when nothing was instrumented.
    pub fn ratio(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.covered as f64 / total as f64
        }
    }
}

/// Inclusive range of source lines, serialized as `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "(u32, u32)", into = "(u32, u32)")]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

impl LineRange {
    /// Endpoints are reordered so `start <= end` always holds.
    pub fn new(start: u32, end: u32) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }
}

impl From<(u32, u32)> for LineRange {
    fn from((start, end): (u32, u32)) -> Self {
        Self::new(start, end)
    }
}

impl From<LineRange> for (u32, u32) {
    fn from(range: LineRange) -> Self {
        (range.start, range.end)
    }
}

/// Coverage facts for a single method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCoverage {
    pub name: String,
    pub descriptor: String,
    pub line: u32,
    pub instruction_coverage: f64,
    pub uncovered_line_ranges: Vec<LineRange>,
    pub recommendations: Vec<String>,
}

/// Coverage facts for a single class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassCoverage {
    pub package: String,
    pub class_name: String,
    pub fqn: String,
    pub source_file: String,
    pub instruction_coverage: f64,
    pub branch_coverage: f64,
    pub uncovered_lines_total: usize,
    pub methods: Vec<MethodCoverage>,
    pub recommendations: Vec<String>,
}

/// Result of analyzing one coverage report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageAnalysis {
    pub report_file: String,
    /// Least-covered classes first
    pub classes: Vec<ClassCoverage>,
}

/// Report-wide instruction and branch totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallCoverage {
    pub report_file: String,
    pub instruction_missed: u64,
    pub instruction_covered: u64,
    pub instruction_ratio: f64,
    pub branch_missed: u64,
    pub branch_covered: u64,
    pub branch_ratio: f64,
}

impl OverallCoverage {
    pub fn from_counters(
        report_file: impl Into<String>,
        instruction: CoverageCounter,
        branch: CoverageCounter,
    ) -> Self {
        Self {
            report_file: report_file.into(),
            instruction_missed: instruction.missed,
            instruction_covered: instruction.covered,
            instruction_ratio: instruction.ratio(),
            branch_missed: branch.missed,
            branch_covered: branch.covered,
            branch_ratio: branch.ratio(),
        }
    }

    pub fn meets_threshold(&self, threshold: f64) -> bool {
        self.instruction_ratio >= threshold
    }
}
