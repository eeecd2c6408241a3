//! Individual pipeline steps

pub mod blur;
pub mod grayscale;
pub mod thinning;
pub mod threshold;
