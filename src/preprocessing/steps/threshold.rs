use image::{GrayImage, Luma};
use imageproc::contrast::otsu_level;

/// Foreground (ridge) value in binary images
pub const FOREGROUND: u8 = 255;
/// Background value in binary images
pub const BACKGROUND: u8 = 0;

/// Result of global binarization
#[derive(Debug, Clone)]
pub struct Binarized {
    pub image: GrayImage,
    /// Otsu level, `None` when the image has no contrast to split
    pub level: Option<u8>,
}

/// Apply Otsu global thresholding
///
/// Ridges are dark on a light background, so pixels at or below the level
/// become foreground. The binary panel therefore shows ridges white on black
/// and thinning runs on the ridges, not on the valleys between them.
/// A flat image has no level and is all background.
pub fn apply(image: &GrayImage) -> Binarized {
    let level = select_level(image);

    let binary = match level {
        Some(level) => GrayImage::from_fn(image.width(), image.height(), |x, y| {
            if image.get_pixel(x, y).0[0] <= level {
                Luma([FOREGROUND])
            } else {
                Luma([BACKGROUND])
            }
        }),
        None => GrayImage::from_pixel(image.width(), image.height(), Luma([BACKGROUND])),
    };

    Binarized {
        image: binary,
        level,
    }
}

/// Otsu level for images with at least two distinct intensities
fn select_level(image: &GrayImage) -> Option<u8> {
    let mut seen = [false; 256];
    let mut distinct = 0;
    for pixel in image.pixels() {
        let value = pixel.0[0] as usize;
        if !seen[value] {
            seen[value] = true;
            distinct += 1;
            if distinct > 1 {
                return Some(otsu_level(image));
            }
        }
    }
    None
}
