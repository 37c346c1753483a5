pub mod document;
pub mod stack;

use crate::config::ColorMode;
use image::DynamicImage;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure while assembling images into a composite output
#[derive(Debug, Error)]
pub enum AssembleError {
    /// The input sequence was empty; no output file is produced
    #[error("cannot assemble an empty image sequence")]
    EmptyInput,

    /// The composed image could not be encoded
    #[error("failed to encode image: {0}")]
    Image(#[from] image::ImageError),

    /// The output file could not be written
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),

    /// The document could not be built
    #[error("failed to build document: {0}")]
    Document(String),
}

/// Convert a decoded image to the requested color space
pub fn convert(image: DynamicImage, mode: ColorMode) -> DynamicImage {
    match mode {
        ColorMode::Rgb => DynamicImage::ImageRgb8(image.to_rgb8()),
        ColorMode::Grayscale => DynamicImage::ImageLuma8(image.to_luma8()),
    }
}

/// Load every decodable image in a directory, sorted by file name.
///
/// Files that fail to decode are skipped, so a directory mixing images
/// with other content is fine.
pub fn images_from_dir(dir: &Path, mode: ColorMode) -> std::io::Result<Vec<DynamicImage>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();

    // Sort by filename rather than by full path
    paths.sort_by_key(|path| path.file_name().map(|name| name.to_os_string()));

    let mut images = Vec::new();
    for path in paths {
        match image::open(&path) {
            Ok(decoded) => images.push(convert(decoded, mode)),
            Err(error) => {
                ::log::debug!("skipping non-image {}: {}", path.display(), error);
            }
        }
    }

    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn test_convert_to_grayscale() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
        let converted = convert(image, ColorMode::Grayscale);
        assert!(matches!(converted, DynamicImage::ImageLuma8(_)));
    }

    #[test]
    fn test_images_from_dir_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();

        // Written out of order; sizes let us verify filename ordering
        DynamicImage::ImageRgb8(RgbImage::new(20, 20))
            .save(dir.path().join("b.png"))
            .unwrap();
        DynamicImage::ImageRgb8(RgbImage::new(10, 10))
            .save(dir.path().join("a.png"))
            .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not an image").unwrap();

        let images = images_from_dir(dir.path(), ColorMode::Rgb).unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].width(), 10);
        assert_eq!(images[1].width(), 20);
    }

    #[test]
    fn test_images_from_dir_missing() {
        assert!(images_from_dir(Path::new("/no/such/dir"), ColorMode::Rgb).is_err());
    }
}
