use crate::error::AppError;
use crate::figure::FigureRenderer;
use crate::storage::Storage;
use image::GrayImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use super::steps;

/// Timing information for a single pipeline step
#[derive(Debug, Clone)]
pub struct StepTiming {
    pub name: String,
    pub time_ms: u64,
}

/// Everything a run produced, including the intermediate stages
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// Rendered comparison figure on disk
    pub output_path: PathBuf,
    #[allow(dead_code)]
    pub original: GrayImage,
    #[allow(dead_code)]
    pub binary: GrayImage,
    #[allow(dead_code)]
    pub thinned: GrayImage,
    /// Otsu level, absent for flat images
    pub threshold: Option<u8>,
    pub total_time_ms: u64,
    pub steps: Vec<StepTiming>,
}

/// Load -> blur -> Otsu -> Zhang-Suen -> render
#[derive(Clone)]
pub struct Pipeline {
    storage: Storage,
    renderer: Arc<FigureRenderer>,
}

impl Pipeline {
    pub fn new(storage: Storage, renderer: Arc<FigureRenderer>) -> Self {
        Self { storage, renderer }
    }

    /// Process an image file and write its comparison figure
    pub fn process(&self, input: &Path) -> Result<PipelineResult, AppError> {
        let start = Instant::now();
        let mut timings = Vec::new();

        let output_path = self.storage.processed_path_for(input)?;

        let original = self.run_step("load", &mut timings, || steps::grayscale::load(input))?;
        let blurred = self.run_step("blur", &mut timings, || Ok(steps::blur::apply(&original)))?;
        let binarized =
            self.run_step("threshold", &mut timings, || Ok(steps::threshold::apply(&blurred)))?;
        let thinned = self.run_step("thin", &mut timings, || {
            Ok(steps::thinning::apply(&binarized.image))
        })?;
        self.run_step("render", &mut timings, || {
            let figure = self
                .renderer
                .compose([&original, &binarized.image, &thinned]);
            self.renderer.save(&figure, &output_path)
        })?;

        let total_time_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            "Processed {} -> {} in {}ms (threshold: {:?})",
            input.display(),
            output_path.display(),
            total_time_ms,
            binarized.level
        );

        Ok(PipelineResult {
            output_path,
            original,
            binary: binarized.image,
            thinned,
            threshold: binarized.level,
            total_time_ms,
            steps: timings,
        })
    }

    fn run_step<T, F>(
        &self,
        name: &str,
        timings: &mut Vec<StepTiming>,
        step_fn: F,
    ) -> Result<T, AppError>
    where
        F: FnOnce() -> Result<T, AppError>,
    {
        let step_start = Instant::now();
        let result = step_fn()?;
        let time_ms = step_start.elapsed().as_millis() as u64;
        tracing::debug!("Step {} took {}ms", name, time_ms);
        timings.push(StepTiming {
            name: name.to_string(),
            time_ms,
        });
        Ok(result)
    }
}
