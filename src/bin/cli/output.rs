//! Output helpers shared by CLI commands.

use owo_colors::OwoColorize;
use serde::Serialize;

/// Pretty-print a value as JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Ratio as a one-decimal percentage, e.g. `0.654` -> `65.4%`.
pub fn format_ratio(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// Percentage colored against a threshold.
pub fn colored_ratio(ratio: f64, threshold: f64) -> String {
    let text = format_ratio(ratio);
    if ratio >= threshold {
        text.green().to_string()
    } else if ratio >= threshold / 2.0 {
        text.yellow().to_string()
    } else {
        text.red().to_string()
    }
}

/// Compact inclusive ranges, e.g. `12-14, 20`.
pub fn format_ranges(ranges: &[(u32, u32)]) -> String {
    ranges
        .iter()
        .map(|&(start, end)| {
            if start == end {
                start.to_string()
            } else {
                format!("{start}-{end}")
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_ratios_and_ranges() {
        assert_eq!(format_ratio(0.654), "65.4%");
        assert_eq!(format_ranges(&[(12, 14), (20, 20)]), "12-14, 20");
        assert_eq!(format_ranges(&[]), "");
    }
}
