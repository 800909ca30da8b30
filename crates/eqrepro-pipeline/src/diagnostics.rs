//! Session diagnostics: timing and sizes for the load step and each run.
//!
//! Timing goes through the [`Clock`] trait so the library never reads the
//! system clock itself. The binary supplies a clock backed by
//! [`std::time::Instant`]; tests supply a fake one.

use std::time::Duration;

use crate::types::Dimensions;

/// Source of monotonic timestamps.
pub trait Clock {
    /// Opaque timestamp type.
    type Instant;

    /// Capture the current time.
    fn now(&self) -> Self::Instant;

    /// Time elapsed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// Diagnostics for the one-time decode of the source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadDiagnostics {
    /// Wall-clock decode duration.
    pub duration: Duration,
    /// Decoded image dimensions.
    pub dimensions: Dimensions,
}

/// Diagnostics for a single clone/equalize/extract(/save) run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDiagnostics {
    /// Zero-based run index.
    pub run: usize,
    /// Time spent deep-cloning the source image.
    pub clone: Duration,
    /// Time spent inside the equalizer.
    pub equalize: Duration,
    /// Time spent copying pixels into the run's buffer.
    pub extract: Duration,
    /// Time spent encoding and writing the PNG (only when saving).
    pub save: Option<Duration>,
}

impl RunDiagnostics {
    /// Sum of all recorded step durations.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.clone + self.equalize + self.extract + self.save.unwrap_or_default()
    }
}

/// Diagnostics for a whole repro session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDiagnostics {
    /// Name of the equalization strategy that was applied.
    pub equalizer: &'static str,
    /// Source image decode.
    pub load: LoadDiagnostics,
    /// One entry per run, in run order.
    pub runs: Vec<RunDiagnostics>,
    /// Total wall-clock duration of the session.
    pub total_duration: Duration,
}

impl SessionDiagnostics {
    /// Format diagnostics as a human-readable table.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Session Diagnostics\n{}", "=".repeat(60)));
        lines.push(format!(
            "Image: {}x{} ({} pixels), decoded in {:.3}ms",
            self.load.dimensions.width,
            self.load.dimensions.height,
            self.load.dimensions.pixel_count(),
            duration_ms(self.load.duration),
        ));
        lines.push(format!("Equalizer: {}", self.equalizer));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<6} {:>10} {:>10} {:>10} {:>10}",
            "Run", "Clone", "Equalize", "Extract", "Save"
        ));
        lines.push("-".repeat(50));

        for run in &self.runs {
            let save = run.save.map_or_else(
                || "-".to_string(),
                |d| format!("{:.3}ms", duration_ms(d)),
            );
            lines.push(format!(
                "{:<6} {:>8.3}ms {:>8.3}ms {:>8.3}ms {save:>10}",
                run.run,
                duration_ms(run.clone),
                duration_ms(run.equalize),
                duration_ms(run.extract),
            ));
        }

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SessionDiagnostics {
        SessionDiagnostics {
            equalizer: "PerChannel",
            load: LoadDiagnostics {
                duration: Duration::from_millis(12),
                dimensions: Dimensions {
                    width: 100,
                    height: 50,
                },
            },
            runs: vec![
                RunDiagnostics {
                    run: 0,
                    clone: Duration::from_millis(1),
                    equalize: Duration::from_millis(4),
                    extract: Duration::from_millis(2),
                    save: None,
                },
                RunDiagnostics {
                    run: 1,
                    clone: Duration::from_millis(1),
                    equalize: Duration::from_millis(5),
                    extract: Duration::from_millis(2),
                    save: Some(Duration::from_millis(7)),
                },
            ],
            total_duration: Duration::from_millis(40),
        }
    }

    #[test]
    fn duration_ms_converts_correctly() {
        let ms = duration_ms(Duration::from_millis(1234));
        assert!((ms - 1234.0).abs() < 0.01);
    }

    #[test]
    fn run_total_includes_optional_save() {
        let diag = sample();
        assert_eq!(diag.runs[0].total(), Duration::from_millis(7));
        assert_eq!(diag.runs[1].total(), Duration::from_millis(15));
    }

    #[test]
    fn report_lists_every_run() {
        let report = sample().report();
        assert!(report.contains("Session Diagnostics"));
        assert!(report.contains("100x50 (5000 pixels)"));
        assert!(report.contains("Equalizer: PerChannel"));
        assert!(report.contains("7.000ms"));
        // Header plus two run rows after the separator.
        let rows = report
            .lines()
            .skip_while(|l| !l.starts_with("---"))
            .skip(1)
            .count();
        assert_eq!(rows, 2);
    }
}
