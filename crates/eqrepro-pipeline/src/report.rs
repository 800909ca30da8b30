//! Human-readable report of per-run mismatches.
//!
//! Lines look like:
//!
//! ```text
//! Run #1: identical to reference
//! Run #2: 0.50% different pixels to reference
//! ```
//!
//! Coloring is cosmetic. [`ReportStyle::Plain`] output is the canonical
//! text; [`ReportStyle::Colored`] wraps the same words in ANSI styling.

use std::fmt;
use std::io::{self, Write};

use colored::Colorize;

use crate::types::Mismatch;

/// Whether to emit ANSI color codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportStyle {
    /// Plain text.
    #[default]
    Plain,
    /// Run prefix in bold cyan, verdict in green or red.
    Colored,
}

/// Smallest ratio that still rounds to a nonzero two-decimal percentage.
const MIN_VISIBLE_RATIO: f64 = 0.000_05;

/// Format `ratio` (`0.0..=1.0`) as a percentage with two decimals.
///
/// A nonzero ratio never renders as `0.00%`; it is shown as `<0.01%`.
#[must_use]
pub fn format_percent(ratio: f64) -> String {
    if ratio > 0.0 && ratio < MIN_VISIBLE_RATIO {
        return "<0.01%".to_string();
    }
    format!("{:.2}%", ratio * 100.0)
}

/// Format the report line for one run.
///
/// The line carries the run index itself, matching `Output-<run>.png`.
#[must_use]
pub fn format_line(mismatch: &Mismatch, style: ReportStyle) -> String {
    let prefix = format!("Run #{}:", mismatch.run);
    let verdict = if mismatch.is_identical() {
        "identical to reference".to_string()
    } else {
        format!(
            "{} different pixels to reference",
            format_percent(mismatch.ratio())
        )
    };

    match style {
        ReportStyle::Plain => format!("{prefix} {verdict}"),
        ReportStyle::Colored => {
            let verdict = if mismatch.is_identical() {
                verdict.green()
            } else {
                verdict.red()
            };
            format!("{} {verdict}", prefix.cyan().bold())
        }
    }
}

/// Write one line per mismatch to `out`. Writes nothing for an empty slice.
///
/// # Errors
///
/// Propagates any error from `out`.
pub fn write_report<W: Write>(
    out: &mut W,
    mismatches: &[Mismatch],
    style: ReportStyle,
) -> io::Result<()> {
    for mismatch in mismatches {
        writeln!(out, "{}", format_line(mismatch, style))?;
    }
    Ok(())
}

/// Write the report to standard output.
///
/// # Errors
///
/// Propagates any error writing to standard output.
pub fn print_report(mismatches: &[Mismatch], style: ReportStyle) -> io::Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_report(&mut lock, mismatches, style)
}

/// Aggregate outcome of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Number of non-reference runs compared.
    pub compared: usize,
    /// How many of them differed from the reference.
    pub divergent: usize,
}

impl Summary {
    /// Summarize a set of mismatches.
    #[must_use]
    pub fn from_mismatches(mismatches: &[Mismatch]) -> Self {
        Self {
            compared: mismatches.len(),
            divergent: mismatches.iter().filter(|m| !m.is_identical()).count(),
        }
    }

    /// Returns `true` if every compared run matched the reference.
    #[must_use]
    pub const fn is_deterministic(&self) -> bool {
        self.divergent == 0
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_deterministic() {
            write!(
                f,
                "{}/{} runs identical to reference",
                self.compared, self.compared
            )
        } else {
            write!(
                f,
                "{}/{} runs differ from reference",
                self.divergent, self.compared
            )
        }
    }
}
