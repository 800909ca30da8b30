//! eqrepro-pipeline: histogram-equalization determinism harness.
//!
//! Decodes one source image, equalizes several independent clones of it,
//! and compares the resulting pixels against the first run:
//! load -> clone + equalize + extract (+ save) per run -> compare -> report.
//!
//! The equalization transform itself comes from `imageproc` and is the
//! subject under test. Any non-zero mismatch between runs means the
//! transform is not a pure function of its input pixels.

pub mod compare;
pub mod diagnostics;
pub mod equalize;
pub mod files;
pub mod report;
pub mod runner;
pub mod types;

pub use compare::compare_to_reference;
pub use diagnostics::{Clock, SessionDiagnostics};
pub use equalize::{EqualizationMethod, Equalizer};
pub use report::{ReportStyle, Summary, print_report};
pub use runner::{SessionResult, equalize_runs, run_session};
pub use types::{Dimensions, Mismatch, PixelBuffer, ReproConfig, ReproError, RgbaImage};
