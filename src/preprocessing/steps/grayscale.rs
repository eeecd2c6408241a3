use crate::error::AppError;
use image::{DynamicImage, GrayImage, ImageReader};
use std::path::Path;

/// Decode a file as single-channel intensity data.
/// The format is sniffed from the content, so a misnamed upload still loads.
pub fn load(path: &Path) -> Result<GrayImage, AppError> {
    let reader = ImageReader::open(path)
        .map_err(|e| AppError::ProcessingError(format!("Failed to open image: {}", e)))?
        .with_guessed_format()
        .map_err(|e| AppError::ProcessingError(format!("Failed to read image: {}", e)))?;

    let image = reader
        .decode()
        .map_err(|e| AppError::ProcessingError(format!("Invalid image: {}", e)))?;

    Ok(apply(&image))
}

/// Convert image to grayscale
pub fn apply(image: &DynamicImage) -> GrayImage {
    image.to_luma8()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::fs;

    #[test]
    fn test_grayscale_converts_color() {
        let mut img = RgbImage::new(10, 10);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(1, 0, Rgb([0, 255, 0]));
        img.put_pixel(2, 0, Rgb([0, 0, 255]));

        let gray = apply(&DynamicImage::ImageRgb8(img));

        assert!(gray.get_pixel(0, 0).0[0] > 0);
        assert!(gray.get_pixel(1, 0).0[0] > 0);
        assert!(gray.get_pixel(2, 0).0[0] > 0);
        assert_eq!(gray.get_pixel(3, 0).0[0], 0);
    }

    #[test]
    fn test_load_ignores_misleading_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.jpg");
        RgbImage::from_pixel(12, 8, Rgb([200, 200, 200]))
            .save_with_format(&path, image::ImageFormat::Png)
            .unwrap();

        let gray = load(&path).unwrap();
        assert_eq!(gray.dimensions(), (12, 8));
    }

    #[test]
    fn test_load_rejects_non_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.png");
        fs::write(&path, b"definitely not pixels").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, AppError::ProcessingError(_)));
    }

    #[test]
    fn test_load_rejects_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");
        fs::write(&path, b"").unwrap();

        assert!(matches!(load(&path), Err(AppError::ProcessingError(_))));
    }
}
