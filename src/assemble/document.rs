use super::AssembleError;
use image::DynamicImage;
use printpdf::{Image, ImageTransform, Mm, PdfDocument, PdfLayerReference};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Resolution used to size pages from image pixel dimensions
const RENDER_DPI: f32 = 300.0;

/// Combine images into a single multi-page PDF, one page per image, pages
/// in input order. Each page is sized to its image so the image fills it
/// edge to edge.
pub fn document(images: &[DynamicImage], path: &Path) -> Result<(), AssembleError> {
    let Some(first) = images.first() else {
        return Err(AssembleError::EmptyInput);
    };

    let title = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("document");

    let (width, height) = page_size(first);
    let (doc, page, layer) = PdfDocument::new(title, width, height, "Layer 1");
    embed(first, &doc.get_page(page).get_layer(layer));

    for image in &images[1..] {
        let (width, height) = page_size(image);
        let (page, layer) = doc.add_page(width, height, "Layer 1");
        embed(image, &doc.get_page(page).get_layer(layer));
    }

    let file = File::create(path)?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|error| AssembleError::Document(error.to_string()))?;

    ::log::info!("saved {}", path.display());
    Ok(())
}

/// Page dimensions for an image at the render resolution
fn page_size(image: &DynamicImage) -> (Mm, Mm) {
    (px_to_mm(image.width()), px_to_mm(image.height()))
}

fn px_to_mm(pixels: u32) -> Mm {
    Mm(pixels as f32 * 25.4 / RENDER_DPI)
}

/// Place an image at the page origin at the render resolution
fn embed(image: &DynamicImage, layer: &PdfLayerReference) {
    let embedded = Image::from_dynamic_image(image);
    embedded.add_to_layer(
        layer.clone(),
        ImageTransform {
            dpi: Some(RENDER_DPI),
            ..Default::default()
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn solid(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::new(width, height))
    }

    fn assert_is_pdf(path: &Path) {
        let bytes = std::fs::read(path).unwrap();
        assert!(bytes.starts_with(b"%PDF"), "output should be a PDF file");
    }

    #[test]
    fn test_document_empty_input_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.pdf");

        let result = document(&[], &path);
        assert!(matches!(result, Err(AssembleError::EmptyInput)));
        assert!(!path.exists());
    }

    #[test]
    fn test_document_single_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("single.pdf");

        document(&[solid(60, 40)], &path).unwrap();
        assert_is_pdf(&path);
    }

    #[test]
    fn test_document_multiple_images() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("multi.pdf");

        let images = vec![solid(60, 40), solid(30, 30), solid(50, 80)];
        document(&images, &path).unwrap();
        assert_is_pdf(&path);

        // Three pages produce a strictly larger file than one
        let single = dir.path().join("single.pdf");
        document(&images[..1], &single).unwrap();
        let multi_len = std::fs::metadata(&path).unwrap().len();
        let single_len = std::fs::metadata(&single).unwrap().len();
        assert!(multi_len > single_len);
    }
}
