use super::AssembleError;
use crate::config::ColorMode;
use image::imageops::{self, FilterType};
use image::DynamicImage;
use std::path::Path;

/// Stack images into a single vertical strip.
///
/// Every image is resized to the minimum width across the inputs, with
/// height scaled by the same ratio to keep its aspect, then pasted onto one
/// canvas top to bottom in input order.
pub fn stack(images: &[DynamicImage], mode: ColorMode) -> Result<DynamicImage, AssembleError> {
    let Some(min_width) = images.iter().map(DynamicImage::width).min() else {
        return Err(AssembleError::EmptyInput);
    };

    let resized: Vec<DynamicImage> = images
        .iter()
        .map(|image| {
            let scaled_height =
                (u64::from(image.height()) * u64::from(min_width) / u64::from(image.width())) as u32;
            image.resize_exact(min_width, scaled_height.max(1), FilterType::Triangle)
        })
        .collect();

    let total_height: u32 = resized.iter().map(DynamicImage::height).sum();
    let mut canvas = match mode {
        ColorMode::Rgb => DynamicImage::new_rgb8(min_width, total_height),
        ColorMode::Grayscale => DynamicImage::new_luma8(min_width, total_height),
    };

    let mut offset: i64 = 0;
    for image in &resized {
        imageops::overlay(&mut canvas, image, 0, offset);
        offset += i64::from(image.height());
    }

    Ok(canvas)
}

/// Stack images and save the strip to `path`; the format is inferred from
/// the path's extension
pub fn stack_to_file(
    images: &[DynamicImage],
    mode: ColorMode,
    path: &Path,
) -> Result<(), AssembleError> {
    let strip = stack(images, mode)?;
    strip.save(path)?;
    ::log::info!("saved {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn solid(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::new(width, height))
    }

    #[test]
    fn test_stack_scales_to_minimum_width() {
        let images = vec![solid(400, 100), solid(200, 50), solid(300, 60)];
        let strip = stack(&images, ColorMode::Rgb).unwrap();

        // Widths [400, 200, 300] -> min 200; heights scale by 200/width:
        // 100*200/400 + 50*200/200 + 60*200/300 = 50 + 50 + 40
        assert_eq!(strip.width(), 200);
        assert_eq!(strip.height(), 140);
    }

    #[test]
    fn test_stack_single_image_unchanged_dimensions() {
        let strip = stack(&[solid(120, 80)], ColorMode::Rgb).unwrap();
        assert_eq!(strip.width(), 120);
        assert_eq!(strip.height(), 80);
    }

    #[test]
    fn test_stack_empty_input() {
        let result = stack(&[], ColorMode::Rgb);
        assert!(matches!(result, Err(AssembleError::EmptyInput)));
    }

    #[test]
    fn test_stack_to_file_writes_nothing_on_empty_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strip.png");

        let result = stack_to_file(&[], ColorMode::Rgb, &path);
        assert!(matches!(result, Err(AssembleError::EmptyInput)));
        assert!(!path.exists());
    }

    #[test]
    fn test_stack_to_file_saves_strip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strip.png");

        stack_to_file(&[solid(100, 40), solid(50, 30)], ColorMode::Rgb, &path).unwrap();
        let reloaded = image::open(&path).unwrap();
        assert_eq!(reloaded.width(), 50);
        // 40*50/100 + 30 = 20 + 30
        assert_eq!(reloaded.height(), 50);
    }
}
