//! On-disk staging for downloaded documents.
//!
//! Every download gets its own file named `<id>_<timestamp>.pdf`, where
//! `id` is the first eight characters of a v4 UUID. The extractor reads
//! back exactly the file it wrote, so concurrent downloads never see each
//! other's documents.

use std::path::{Path, PathBuf};

use chrono::Utc;
use uuid::Uuid;

use crate::error::AppError;

const STAGED_EXTENSION: &str = "pdf";

/// What happens to a staged file once its text has been read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Retention {
    /// Delete the file after extraction.
    #[default]
    Remove,
    /// Leave the file in the staging directory.
    Keep,
}

/// Where downloads are written and whether they are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingConfig {
    pub dir: PathBuf,
    pub retention: Retention,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            dir: std::env::temp_dir().join("perusal").join("staging"),
            retention: Retention::default(),
        }
    }
}

impl StagingConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            retention: Retention::default(),
        }
    }

    pub fn with_retention(mut self, retention: Retention) -> Self {
        self.retention = retention;
        self
    }

    /// Write `bytes` to a fresh file in the staging directory, creating the
    /// directory if needed.
    pub async fn stage(&self, bytes: &[u8]) -> Result<StagedFile, AppError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.dir.join(staged_file_name());
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "Staged document");

        Ok(StagedFile {
            path,
            retention: self.retention,
            released: false,
        })
    }
}

/// A document written to the staging directory.
///
/// Dropping it without calling [`StagedFile::release`] still applies the
/// retention policy, so a read abandoned by a timeout or cancellation does
/// not leave the download behind.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    retention: Retention,
    released: bool,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply the retention policy. Removal failures are logged, not returned.
    pub async fn release(mut self) {
        if self.retention == Retention::Remove
            && let Err(e) = tokio::fs::remove_file(&self.path).await
        {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove staged document");
        }
        self.released = true;
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if self.released || self.retention == Retention::Keep {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Removed abandoned staged document"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove staged document");
            }
        }
    }
}

/// `<uuid8>_<YYYYmmdd_HHMMSS>.pdf`
pub fn staged_file_name() -> String {
    let id = Uuid::new_v4().simple().to_string();
    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    format!("{}_{}.{}", &id[..8], timestamp, STAGED_EXTENSION)
}
