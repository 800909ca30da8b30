//! Shared types for the equalization repro pipeline.

use std::path::PathBuf;

use image::Rgba;

use crate::equalize::EqualizationMethod;

/// Re-export `RgbaImage` so downstream crates can reference decoded
/// images without depending on `image` directly.
pub use image::RgbaImage;

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Total pixel count (`width * height`).
    #[must_use]
    pub fn pixel_count(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Flat row-major copy of an image's pixels (`index = y * width + x`).
///
/// Extracted once per equalization run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    dimensions: Dimensions,
    pixels: Vec<Rgba<u8>>,
}

impl PixelBuffer {
    /// Copy every pixel of `image` into a new buffer, one row at a time.
    #[must_use]
    pub fn from_image(image: &RgbaImage) -> Self {
        let dimensions = Dimensions {
            width: image.width(),
            height: image.height(),
        };
        let mut pixels = Vec::with_capacity(image.as_raw().len() / 4);
        for row in image.rows() {
            pixels.extend(row.copied());
        }
        Self { dimensions, pixels }
    }

    /// Build a buffer directly from pixel values.
    ///
    /// Returns `None` when `pixels.len()` is not `width * height`.
    #[must_use]
    pub fn from_pixels(dimensions: Dimensions, pixels: Vec<Rgba<u8>>) -> Option<Self> {
        let expected = usize::try_from(dimensions.pixel_count()).ok()?;
        (pixels.len() == expected).then_some(Self { dimensions, pixels })
    }

    /// Dimensions of the image this buffer was extracted from.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Number of pixels in the buffer.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.pixels.len()
    }

    /// Returns `true` if the buffer holds no pixels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Returns a slice of all pixels in row-major order.
    #[must_use]
    pub fn pixels(&self) -> &[Rgba<u8>] {
        &self.pixels
    }
}

/// Mismatch of one non-reference run against the reference run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch {
    /// Zero-based run index (always >= 1, run 0 is the reference).
    pub run: usize,
    /// Number of pixel positions that differ from the reference.
    pub differing: usize,
    /// Total pixel count of the compared buffers.
    pub total: usize,
}

impl Mismatch {
    /// Returns `true` if the run matched the reference bit for bit.
    #[must_use]
    pub const fn is_identical(&self) -> bool {
        self.differing == 0
    }

    /// Fraction of differing pixels in `0.0..=1.0`.
    ///
    /// An empty buffer has nothing to differ, so its ratio is `0.0`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.differing as f64 / self.total as f64
        }
    }
}

/// Configuration for a repro session.
///
/// The binary uses [`ReproConfig::default`] and only toggles `save`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReproConfig {
    /// Image decoded once and equalized `runs` times.
    pub input: PathBuf,

    /// How many independent equalization runs to perform. Must be >= 1.
    pub runs: usize,

    /// Directory receiving `Output-<i>.png` files when `save` is set.
    pub output_dir: PathBuf,

    /// Whether to persist every equalized clone as PNG.
    pub save: bool,

    /// Equalization strategy applied identically to every clone.
    pub method: EqualizationMethod,
}

impl ReproConfig {
    /// Default sample image path, relative to the working directory.
    pub const DEFAULT_INPUT: &'static str = "assets/sample.jpg";
    /// Default number of equalization runs.
    pub const DEFAULT_RUNS: usize = 5;
    /// Default output directory for saved PNGs.
    pub const DEFAULT_OUTPUT_DIR: &'static str = "Output";

    /// Check invariants that cannot be expressed in the type.
    ///
    /// # Errors
    ///
    /// Returns [`ReproError::InvalidConfig`] if `runs` is zero.
    pub fn validate(&self) -> Result<(), ReproError> {
        if self.runs == 0 {
            return Err(ReproError::InvalidConfig(
                "run count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Path of the PNG written for run `index`.
    #[must_use]
    pub fn output_path(&self, index: usize) -> PathBuf {
        self.output_dir.join(format!("Output-{index}.png"))
    }
}

impl Default for ReproConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(Self::DEFAULT_INPUT),
            runs: Self::DEFAULT_RUNS,
            output_dir: PathBuf::from(Self::DEFAULT_OUTPUT_DIR),
            save: false,
            method: EqualizationMethod::default(),
        }
    }
}

/// Errors that abort a repro session.
///
/// There is no partial-failure mode: a single failed run invalidates
/// the whole comparison, so every variant is fatal.
#[derive(Debug, thiserror::Error)]
pub enum ReproError {
    /// The input image is missing or could not be decoded.
    #[error("failed to decode image {}", path.display())]
    Decode {
        /// Path that was being loaded.
        path: PathBuf,
        /// Underlying decoder or I/O error.
        #[source]
        source: image::ImageError,
    },

    /// The output directory could not be created.
    #[error("failed to create output directory {}", path.display())]
    CreateOutputDir {
        /// Directory that was being created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An equalized image could not be encoded or written.
    #[error("failed to save {}", path.display())]
    Save {
        /// Destination file.
        path: PathBuf,
        /// Underlying encoder or I/O error.
        #[source]
        source: image::ImageError,
    },

    /// A run's pixel buffer length differs from the reference.
    #[error("run #{run} has {actual} pixels but the reference has {expected}")]
    LengthMismatch {
        /// Zero-based index of the offending run.
        run: usize,
        /// Reference buffer length.
        expected: usize,
        /// Offending buffer length.
        actual: usize,
    },

    /// Comparison was requested over zero buffers.
    #[error("no runs to compare")]
    NoRuns,

    /// Session configuration is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn pixel_buffer_is_row_major() {
        let img = RgbaImage::from_fn(3, 2, |x, y| Rgba([x as u8, y as u8, 0, 255]));
        let buffer = PixelBuffer::from_image(&img);
        assert_eq!(buffer.len(), 6);
        // index = y * width + x
        assert_eq!(buffer.pixels()[4], Rgba([1, 1, 0, 255]));
        assert_eq!(buffer.pixels()[2], Rgba([2, 0, 0, 255]));
        assert_eq!(
            buffer.dimensions(),
            Dimensions {
                width: 3,
                height: 2
            }
        );
    }

    #[test]
    fn from_pixels_rejects_wrong_length() {
        let dims = Dimensions {
            width: 2,
            height: 2,
        };
        assert!(PixelBuffer::from_pixels(dims, vec![Rgba([0; 4]); 3]).is_none());
        assert!(PixelBuffer::from_pixels(dims, vec![Rgba([0; 4]); 4]).is_some());
    }

    #[test]
    fn mismatch_ratio() {
        let m = Mismatch {
            run: 1,
            differing: 5,
            total: 1000,
        };
        assert!((m.ratio() - 0.005).abs() < f64::EPSILON);
        assert!(!m.is_identical());
    }

    #[test]
    fn empty_mismatch_ratio_is_zero() {
        let m = Mismatch {
            run: 1,
            differing: 0,
            total: 0,
        };
        assert!((m.ratio()).abs() < f64::EPSILON);
        assert!(m.is_identical());
    }

    #[test]
    fn default_config_is_valid() {
        let config = ReproConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.runs, 5);
        assert!(!config.save);
    }

    #[test]
    fn zero_runs_is_invalid() {
        let config = ReproConfig {
            runs: 0,
            ..ReproConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ReproError::InvalidConfig(_))
        ));
    }

    #[test]
    fn output_path_naming() {
        let config = ReproConfig::default();
        assert_eq!(
            config.output_path(3),
            PathBuf::from("Output").join("Output-3.png")
        );
    }
}
