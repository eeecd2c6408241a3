//! On-disk layout for raw uploads and rendered figures.
//!
//! Uploads keep their client-supplied name and artifacts keep the upload's
//! basename, so a repeated filename overwrites both files.

use crate::error::AppError;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Storage {
    upload_dir: PathBuf,
    processed_dir: PathBuf,
}

impl Storage {
    /// Create both directories if they are missing
    pub fn init(
        upload_dir: impl Into<PathBuf>,
        processed_dir: impl Into<PathBuf>,
    ) -> Result<Self, AppError> {
        let storage = Self {
            upload_dir: upload_dir.into(),
            processed_dir: processed_dir.into(),
        };

        for dir in [&storage.upload_dir, &storage.processed_dir] {
            fs::create_dir_all(dir).map_err(|e| {
                AppError::Internal(format!("Failed to create {}: {}", dir.display(), e))
            })?;
        }

        Ok(storage)
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn processed_dir(&self) -> &Path {
        &self.processed_dir
    }

    /// Write an upload under its own name, replacing any earlier file
    pub fn save_upload(&self, filename: &str, data: &[u8]) -> Result<PathBuf, AppError> {
        let name = file_name_component(filename).ok_or(AppError::NoFileSelected)?;
        let path = self.upload_dir.join(name);

        fs::write(&path, data).map_err(|e| {
            AppError::Internal(format!("Failed to save upload {}: {}", path.display(), e))
        })?;

        tracing::debug!("Saved upload to {} ({} bytes)", path.display(), data.len());
        Ok(path)
    }

    /// Artifact path for an input file: same basename, processed directory
    pub fn processed_path_for(&self, input: &Path) -> Result<PathBuf, AppError> {
        let basename = input.file_name().ok_or_else(|| {
            AppError::ProcessingError(format!("{} has no file name", input.display()))
        })?;
        Ok(self.processed_dir.join(basename))
    }

    /// Resolve an artifact by name, if it exists
    pub fn processed_file(&self, filename: &str) -> Option<PathBuf> {
        // Only plain names are served; anything with a path separator is not ours.
        if file_name_component(filename)? != filename {
            return None;
        }
        let path = self.processed_dir.join(filename);
        path.is_file().then_some(path)
    }
}

/// Final path component of a client-supplied filename.
///
/// Browsers on Windows may send a full `C:\...` path, so both separators count.
pub fn file_name_component(filename: &str) -> Option<&str> {
    let name = filename.rsplit(['/', '\\']).next()?.trim();
    match name {
        "" | "." | ".." => None,
        _ => Some(name),
    }
}
