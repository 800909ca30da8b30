//! Filesystem boundary: decoding the source image and persisting results.
//!
//! Every function here performs blocking I/O on the calling thread and
//! releases its file handle before returning.

use std::path::Path;

use image::ImageFormat;

use crate::types::{ReproError, RgbaImage};

/// Decode the image at `path` into 8-bit RGBA.
///
/// Any format the `image` crate was built with is accepted; the pixels
/// are converted to RGBA regardless of the source color type.
///
/// # Errors
///
/// Returns [`ReproError::Decode`] if the file is missing, unreadable, or
/// not a decodable image.
pub fn load_rgba(path: &Path) -> Result<RgbaImage, ReproError> {
    let decoded = image::open(path).map_err(|source| ReproError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(decoded.into_rgba8())
}

/// Create `dir` and any missing parents. Succeeds if it already exists.
///
/// # Errors
///
/// Returns [`ReproError::CreateOutputDir`] if the directory cannot be
/// created.
pub fn ensure_output_dir(dir: &Path) -> Result<(), ReproError> {
    std::fs::create_dir_all(dir).map_err(|source| ReproError::CreateOutputDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Encode `image` as PNG at `path`, overwriting any existing file.
///
/// # Errors
///
/// Returns [`ReproError::Save`] if encoding or writing fails.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), ReproError> {
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| ReproError::Save {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use image::Rgba;

    fn checker(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 128])
            }
        })
    }

    #[test]
    fn missing_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does-not-exist.jpg");
        let result = load_rgba(&path);
        assert!(
            matches!(result, Err(ReproError::Decode { ref path, .. }) if path.ends_with("does-not-exist.jpg"))
        );
    }

    #[test]
    fn corrupt_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.png");
        std::fs::write(&path, [0xFF, 0xFE, 0x00, 0x01]).unwrap();
        assert!(matches!(load_rgba(&path), Err(ReproError::Decode { .. })));
    }

    #[test]
    fn save_then_load_preserves_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checker.png");
        let img = checker(5, 3);
        save_png(&img, &path).unwrap();
        assert_eq!(load_rgba(&path).unwrap(), img);
    }

    #[test]
    fn save_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        save_png(&checker(4, 4), &path).unwrap();
        save_png(&checker(2, 6), &path).unwrap();
        assert_eq!(load_rgba(&path).unwrap().dimensions(), (2, 6));
    }

    #[test]
    fn save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");
        assert!(matches!(
            save_png(&checker(2, 2), &path),
            Err(ReproError::Save { .. })
        ));
    }

    #[test]
    fn ensure_output_dir_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("Output");
        ensure_output_dir(&out).unwrap();
        ensure_output_dir(&out).unwrap();
        assert!(out.is_dir());
    }

    #[test]
    fn ensure_output_dir_over_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("Output");
        std::fs::write(&out, b"not a directory").unwrap();
        assert!(matches!(
            ensure_output_dir(&out),
            Err(ReproError::CreateOutputDir { .. })
        ));
    }
}
