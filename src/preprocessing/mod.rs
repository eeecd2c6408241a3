//! Fingerprint preprocessing: load, smooth, binarize, thin.
//!
//! Every step runs unconditionally; the pipeline never branches on image
//! content.

pub mod pipeline;
pub mod steps;

pub use pipeline::Pipeline;
