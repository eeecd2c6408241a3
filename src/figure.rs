//! Side-by-side comparison figure: original, binary, thinned.

use crate::error::AppError;
use ab_glyph::{FontVec, PxScale};
use image::{GrayImage, ImageFormat, Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::path::Path;

/// Panel titles, left to right
pub const PANEL_TITLES: [&str; 3] = ["Original Image", "Binary Image", "Thinned Image"];

/// Space around and between panels
pub const MARGIN: u32 = 20;

/// Height of the band above each panel reserved for its title
pub const TITLE_BAND: u32 = 40;

const TITLE_SIZE: f32 = 24.0;
const PAPER: Rgb<u8> = Rgb([255, 255, 255]);
const INK: Rgb<u8> = Rgb([0, 0, 0]);

pub struct FigureRenderer {
    font: Option<FontVec>,
}

impl FigureRenderer {
    /// Load the title font, if one is configured
    pub fn new(font_path: Option<&Path>) -> Result<Self, AppError> {
        let font = match font_path {
            Some(path) => {
                let data = std::fs::read(path).map_err(|e| {
                    AppError::Internal(format!("Failed to read font {}: {}", path.display(), e))
                })?;
                let font = FontVec::try_from_vec(data).map_err(|e| {
                    AppError::Internal(format!("Failed to parse font {}: {}", path.display(), e))
                })?;
                tracing::info!("Panel titles rendered with {}", path.display());
                Some(font)
            }
            None => {
                tracing::info!("No font configured, panel titles disabled");
                None
            }
        };

        Ok(Self { font })
    }

    /// Compose the three stages left to right on a white canvas
    pub fn compose(&self, panels: [&GrayImage; 3]) -> RgbImage {
        let panel_width = panels.iter().map(|p| p.width()).max().unwrap_or(0);
        let panel_height = panels.iter().map(|p| p.height()).max().unwrap_or(0);

        let width = panel_width * 3 + MARGIN * 4;
        let height = TITLE_BAND + panel_height + MARGIN * 2;
        let mut canvas = RgbImage::from_pixel(width, height, PAPER);

        for (i, panel) in panels.iter().enumerate() {
            let left = MARGIN + i as u32 * (panel_width + MARGIN);
            let top = MARGIN + TITLE_BAND;

            for (x, y, pixel) in panel.enumerate_pixels() {
                let v = pixel.0[0];
                canvas.put_pixel(left + x, top + y, Rgb([v, v, v]));
            }

            if let Some(font) = &self.font {
                let scale = PxScale::from(TITLE_SIZE);
                let title = PANEL_TITLES[i];
                let (text_width, text_height) = text_size(scale, font, title);
                let x = left as i32 + (panel_width as i32 - text_width as i32) / 2;
                let y = MARGIN as i32 + (TITLE_BAND as i32 - text_height as i32) / 2;
                draw_text_mut(&mut canvas, INK, x.max(0), y.max(0), scale, font, title);
            }
        }

        canvas
    }

    /// Write the figure, picking the encoder from the file extension
    pub fn save(&self, figure: &RgbImage, path: &Path) -> Result<(), AppError> {
        let format = output_format(path);
        figure.save_with_format(path, format).map_err(|e| {
            AppError::ProcessingError(format!("Failed to save {}: {}", path.display(), e))
        })
    }
}

/// Encoders used for artifacts; anything else falls back to PNG
pub fn output_format(path: &Path) -> ImageFormat {
    match ImageFormat::from_path(path) {
        Ok(format @ (ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Bmp | ImageFormat::Tiff)) => {
            format
        }
        _ => ImageFormat::Png,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_compose_lays_out_three_panels() {
        let renderer = FigureRenderer::new(None).unwrap();
        let original = GrayImage::from_pixel(30, 20, Luma([100]));
        let binary = GrayImage::from_pixel(30, 20, Luma([255]));
        let thinned = GrayImage::from_pixel(30, 20, Luma([0]));

        let figure = renderer.compose([&original, &binary, &thinned]);

        assert_eq!(figure.width(), 30 * 3 + MARGIN * 4);
        assert_eq!(figure.height(), 20 + TITLE_BAND + MARGIN * 2);

        let top = MARGIN + TITLE_BAND;
        assert_eq!(figure.get_pixel(MARGIN, top), &Rgb([100, 100, 100]));
        assert_eq!(figure.get_pixel(MARGIN * 2 + 30, top), &Rgb([255, 255, 255]));
        assert_eq!(figure.get_pixel(MARGIN * 3 + 60, top), &Rgb([0, 0, 0]));
        // Title band stays blank without a font
        assert_eq!(figure.get_pixel(MARGIN + 15, MARGIN + 5), &PAPER);
    }

    #[test]
    fn test_output_format_follows_extension() {
        assert_eq!(output_format(Path::new("a.png")), ImageFormat::Png);
        assert_eq!(output_format(Path::new("a.JPG")), ImageFormat::Jpeg);
        assert_eq!(output_format(Path::new("a.tif")), ImageFormat::Tiff);
        assert_eq!(output_format(Path::new("a.bmp")), ImageFormat::Bmp);
        assert_eq!(output_format(Path::new("a.gif")), ImageFormat::Png);
        assert_eq!(output_format(Path::new("noextension")), ImageFormat::Png);
    }

    #[test]
    fn test_missing_font_is_an_error() {
        let result = FigureRenderer::new(Some(Path::new("/nonexistent/font.ttf")));
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[test]
    fn test_save_writes_png_under_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("print.webp");
        let renderer = FigureRenderer::new(None).unwrap();
        let figure = RgbImage::from_pixel(4, 4, PAPER);

        renderer.save(&figure, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
    }
}
