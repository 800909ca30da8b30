//! Exact pixel comparison of every run against the reference run.
//!
//! Equality is over the full `Rgba<u8>` value with no tolerance: a single
//! flipped bit in any channel counts as a mismatch.

use crate::types::{Mismatch, PixelBuffer, ReproError};

/// Compare runs `1..N` against run 0.
///
/// Returns one [`Mismatch`] per non-reference run, in run order, so the
/// result length is always `buffers.len() - 1`.
///
/// # Errors
///
/// Returns [`ReproError::NoRuns`] if `buffers` is empty.
/// Returns [`ReproError::LengthMismatch`] if any run's buffer length
/// differs from the reference.
pub fn compare_to_reference(buffers: &[PixelBuffer]) -> Result<Vec<Mismatch>, ReproError> {
    let (reference, runs) = buffers.split_first().ok_or(ReproError::NoRuns)?;

    runs.iter()
        .enumerate()
        .map(|(i, buffer)| {
            let run = i + 1;
            if buffer.len() != reference.len() {
                return Err(ReproError::LengthMismatch {
                    run,
                    expected: reference.len(),
                    actual: buffer.len(),
                });
            }
            Ok(Mismatch {
                run,
                differing: count_differing(reference, buffer),
                total: reference.len(),
            })
        })
        .collect()
}

/// Count positions where two equal-length buffers differ.
fn count_differing(reference: &PixelBuffer, candidate: &PixelBuffer) -> usize {
    reference
        .pixels()
        .iter()
        .zip(candidate.pixels())
        .filter(|(a, b)| a != b)
        .count()
}
