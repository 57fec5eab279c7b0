//! Compression of uncovered line numbers into contiguous ranges.

use std::collections::BTreeSet;

use super::types::LineRange;

/// Group line numbers into ascending, disjoint, inclusive ranges.
///
/// Input order and duplicates do not matter; numbers that differ by exactly
/// one end up in the same range.
pub fn group_into_ranges<I>(lines: I) -> Vec<LineRange>
where
    I: IntoIterator<Item = u32>,
{
    let sorted: BTreeSet<u32> = lines.into_iter().collect();
    let mut ranges: Vec<LineRange> = Vec::new();

    for line in sorted {
        match ranges.last_mut() {
            Some(current) if current.end.checked_add(1) == Some(line) => current.end = line,
            _ => ranges.push(LineRange::new(line, line)),
        }
    }

    ranges
}
