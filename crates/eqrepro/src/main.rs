//! eqrepro: histogram-equalization determinism check.
//!
//! Equalizes the sample image several times from independent clones and
//! reports, per run, how many pixels differ from the first run. Any
//! difference means the equalization routine is not deterministic.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin eqrepro -- [-s]
//! ```
//!
//! With `-s` every equalized clone is also written to
//! `Output/Output-<i>.png` for visual inspection.
//!
//! Diagnostics are logged to stderr; set `RUST_LOG=debug` for per-run
//! timings.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::error::Error;
use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use eqrepro_pipeline::{Clock, ReportStyle, ReproConfig, Summary, print_report, run_session};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Check whether repeated histogram equalization of one image is
/// bit-identical across runs.
#[derive(Parser)]
#[command(name = "eqrepro", version)]
struct Cli {
    /// Save every equalized run as Output/Output-<i>.png.
    #[arg(short = 's')]
    save: bool,
}

/// Build the session config: fixed constants, only `save` comes from
/// the command line.
fn config_from_cli(cli: &Cli) -> ReproConfig {
    ReproConfig {
        save: cli.save,
        ..ReproConfig::default()
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eqrepro=info,eqrepro_pipeline=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Line announcing that run `run` was written to `path`.
fn saved_line(run: usize, path: &Path) -> String {
    format!("Saved run #{run} to {}", path.display())
}

/// Print an error followed by its `source()` chain.
fn print_error_chain(err: &dyn Error) {
    eprintln!("Error: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let config = config_from_cli(&cli);
    tracing::debug!(?config, "starting session");

    let result = match run_session(
        &config,
        &config.method,
        &StdClock,
        |run, path| println!("{}", saved_line(run, path)),
    ) {
        Ok(result) => result,
        Err(e) => {
            print_error_chain(&e);
            return ExitCode::FAILURE;
        }
    };

    tracing::debug!("\n{}", result.diagnostics.report());

    let style = if std::io::stdout().is_terminal() {
        ReportStyle::Colored
    } else {
        ReportStyle::Plain
    };
    if let Err(e) = print_report(&result.mismatches, style) {
        print_error_chain(&e);
        return ExitCode::FAILURE;
    }

    let summary = Summary::from_mismatches(&result.mismatches);
    if summary.is_deterministic() {
        tracing::info!(%summary, "equalization is deterministic");
    } else {
        tracing::warn!(%summary, "equalization diverged between runs");
    }

    ExitCode::SUCCESS
}

/// [`Clock`] implementation backed by [`std::time::Instant`].
struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed(&self, since: &Instant) -> Duration {
        since.elapsed()
    }
}
