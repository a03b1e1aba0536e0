//! Process-lifetime scratch directory.
//!
//! Transcode outputs and concat lists live here. The directory is wiped at
//! startup and removed at shutdown; neither failure is fatal.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    /// Delete any leftovers at `path` and recreate it empty.
    pub async fn init(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match tokio::fs::remove_dir_all(&path).await {
            Ok(()) => tracing::debug!(path = %path.display(), "removed stale scratch directory"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to clear scratch directory"),
        }
        if let Err(e) = tokio::fs::create_dir_all(&path).await {
            tracing::warn!(path = %path.display(), error = %e, "failed to create scratch directory");
        }
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn cleanup(&self) {
        match tokio::fs::remove_dir_all(&self.path).await {
            Ok(()) => tracing::debug!(path = %self.path.display(), "removed scratch directory"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %self.path.display(), error = %e, "failed to remove scratch directory"),
        }
    }
}
