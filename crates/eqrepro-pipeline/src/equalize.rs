//! Histogram equalization: the operation under test.
//!
//! This module defines the [`Equalizer`] trait for pluggable equalization
//! strategies and the [`EqualizationMethod`] enum selecting one of the
//! built-in strategies at runtime.
//!
//! Both built-in strategies delegate the actual remapping to
//! [`imageproc::contrast::equalize_histogram_mut`]. The harness never
//! reimplements the transform: any divergence between runs must come
//! from the library, not from this wrapper.

use std::fmt;

use image::{GrayImage, Luma};

use crate::types::RgbaImage;

/// Selects which built-in equalization strategy to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EqualizationMethod {
    /// Equalize the R, G and B channels independently. Alpha is untouched.
    #[default]
    PerChannel,
    /// Equalize the luma channel and write it back to R, G and B,
    /// producing a grayscale result. Alpha is untouched.
    Luminance,
}

impl fmt::Display for EqualizationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Trait for histogram equalization strategies.
///
/// Implementations mutate the image in place and must not keep state
/// between calls, so applying the same value to several clones is
/// expected to give identical output.
pub trait Equalizer {
    /// Equalize `image` in place.
    fn equalize(&self, image: &mut RgbaImage);

    /// Short human-readable strategy name for logs.
    fn name(&self) -> &'static str;
}

impl Equalizer for EqualizationMethod {
    fn equalize(&self, image: &mut RgbaImage) {
        match *self {
            Self::PerChannel => equalize_per_channel(image),
            Self::Luminance => equalize_luminance(image),
        }
    }

    fn name(&self) -> &'static str {
        match *self {
            Self::PerChannel => "PerChannel",
            Self::Luminance => "Luminance",
        }
    }
}

/// Equalize R, G and B as three independent grayscale images.
///
/// `equalize_histogram_mut` only accepts `GrayImage`, so each color
/// channel is split out, equalized and written back.
fn equalize_per_channel(image: &mut RgbaImage) {
    let (w, h) = image.dimensions();

    for c in 0..3 {
        let mut channel = GrayImage::from_fn(w, h, |x, y| Luma([image.get_pixel(x, y).0[c]]));
        imageproc::contrast::equalize_histogram_mut(&mut channel);

        for (dst, src) in image.pixels_mut().zip(channel.pixels()) {
            dst.0[c] = src.0[0];
        }
    }
}

/// Equalize the luma of the image and store it in every color channel.
fn equalize_luminance(image: &mut RgbaImage) {
    let mut luma: GrayImage = image::imageops::grayscale(&*image);
    imageproc::contrast::equalize_histogram_mut(&mut luma);

    for (dst, src) in image.pixels_mut().zip(luma.pixels()) {
        let l = src.0[0];
        dst.0[0] = l;
        dst.0[1] = l;
        dst.0[2] = l;
    }
}
