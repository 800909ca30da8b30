//! Session orchestration: load once, equalize N clones, compare.
//!
//! # Steps
//!
//! 1. Validate the config and, when saving, create the output directory
//! 2. Decode the source image
//! 3. For each run: clone, equalize, extract pixels, optionally save
//! 4. Compare every run against run 0
//!
//! Steps run strictly in order on the calling thread. The first error
//! aborts the session; no run is skipped or retried.

use std::path::Path;

use crate::compare::compare_to_reference;
use crate::diagnostics::{Clock, LoadDiagnostics, RunDiagnostics, SessionDiagnostics};
use crate::equalize::Equalizer;
use crate::files;
use crate::types::{Dimensions, Mismatch, PixelBuffer, ReproConfig, ReproError, RgbaImage};

/// Everything a finished session produced.
#[derive(Debug, Clone)]
pub struct SessionResult {
    /// One buffer per run, index-aligned with run number.
    pub buffers: Vec<PixelBuffer>,
    /// One entry per non-reference run.
    pub mismatches: Vec<Mismatch>,
    /// Timing and size diagnostics.
    pub diagnostics: SessionDiagnostics,
}

/// Run a full repro session described by `config`.
///
/// `on_saved` is called after each PNG is written with the run index and
/// the file path; it is never called when `config.save` is `false`.
///
/// # Errors
///
/// Returns [`ReproError::InvalidConfig`] for a zero run count,
/// [`ReproError::CreateOutputDir`] / [`ReproError::Save`] when saving
/// fails, and [`ReproError::Decode`] when the input cannot be loaded.
pub fn run_session<E, C, F>(
    config: &ReproConfig,
    equalizer: &E,
    clock: &C,
    on_saved: F,
) -> Result<SessionResult, ReproError>
where
    E: Equalizer + ?Sized,
    C: Clock,
    F: FnMut(usize, &Path),
{
    config.validate()?;
    let session_start = clock.now();

    if config.save {
        files::ensure_output_dir(&config.output_dir)?;
        tracing::debug!(dir = %config.output_dir.display(), "output directory ready");
    }

    let load_start = clock.now();
    let source = files::load_rgba(&config.input)?;
    let load = LoadDiagnostics {
        duration: clock.elapsed(&load_start),
        dimensions: Dimensions {
            width: source.width(),
            height: source.height(),
        },
    };
    tracing::info!(
        path = %config.input.display(),
        width = load.dimensions.width,
        height = load.dimensions.height,
        "loaded source image"
    );

    let (buffers, runs) = equalize_runs(&source, config, equalizer, clock, on_saved)?;
    drop(source);

    let mismatches = compare_to_reference(&buffers)?;

    let diagnostics = SessionDiagnostics {
        equalizer: equalizer.name(),
        load,
        runs,
        total_duration: clock.elapsed(&session_start),
    };

    Ok(SessionResult {
        buffers,
        mismatches,
        diagnostics,
    })
}

/// Equalize `config.runs` independent clones of `source`.
///
/// Each clone is dropped as soon as its pixels are extracted (and, when
/// `config.save` is set, after it has been written to
/// [`ReproConfig::output_path`]). The output directory must already
/// exist when saving.
///
/// # Errors
///
/// Returns [`ReproError::Save`] if writing a PNG fails.
pub fn equalize_runs<E, C, F>(
    source: &RgbaImage,
    config: &ReproConfig,
    equalizer: &E,
    clock: &C,
    mut on_saved: F,
) -> Result<(Vec<PixelBuffer>, Vec<RunDiagnostics>), ReproError>
where
    E: Equalizer + ?Sized,
    C: Clock,
    F: FnMut(usize, &Path),
{
    let mut buffers = Vec::with_capacity(config.runs);
    let mut diagnostics = Vec::with_capacity(config.runs);

    for run in 0..config.runs {
        let t = clock.now();
        let mut clone = source.clone();
        let clone_duration = clock.elapsed(&t);

        let t = clock.now();
        equalizer.equalize(&mut clone);
        let equalize_duration = clock.elapsed(&t);

        let t = clock.now();
        let buffer = PixelBuffer::from_image(&clone);
        let extract_duration = clock.elapsed(&t);

        let save_duration = if config.save {
            let path = config.output_path(run);
            let t = clock.now();
            files::save_png(&clone, &path)?;
            let d = clock.elapsed(&t);
            tracing::info!(run, path = %path.display(), "saved equalized image");
            on_saved(run, &path);
            Some(d)
        } else {
            None
        };

        let run_diagnostics = RunDiagnostics {
            run,
            clone: clone_duration,
            equalize: equalize_duration,
            extract: extract_duration,
            save: save_duration,
        };
        tracing::debug!(
            run,
            equalizer = equalizer.name(),
            total_ms = run_diagnostics.total().as_secs_f64() * 1000.0,
            "run complete"
        );

        buffers.push(buffer);
        diagnostics.push(run_diagnostics);
    }

    Ok((buffers, diagnostics))
}
