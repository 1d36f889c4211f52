//! Output directory layout.

use derive_getters::Getters;
use manimate_error::{StorageError, StorageErrorKind};
use std::path::{Path, PathBuf};

/// The two output subdirectories under one root.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct OutputLayout {
    /// Output root
    root: PathBuf,
    /// Rendered media
    animations: PathBuf,
    /// Archived scripts
    scripts: PathBuf,
}

impl OutputLayout {
    /// Layout with the given subdirectory names. Nothing is created yet.
    pub fn new(
        root: impl Into<PathBuf>,
        animations_subdir: impl AsRef<Path>,
        scripts_subdir: impl AsRef<Path>,
    ) -> Self {
        let root = root.into();
        Self {
            animations: root.join(animations_subdir),
            scripts: root.join(scripts_subdir),
            root,
        }
    }

    /// Layout with the default `animations/` and `scripts/` names.
    pub fn with_defaults(root: impl Into<PathBuf>) -> Self {
        Self::new(root, "animations", "scripts")
    }

    /// Create both subdirectories if missing.
    #[tracing::instrument(skip(self), fields(root = %self.root.display()))]
    pub async fn prepare(&self) -> Result<(), StorageError> {
        for dir in [&self.animations, &self.scripts] {
            tokio::fs::create_dir_all(dir).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    dir.display(),
                    e
                )))
            })?;
        }
        tracing::debug!("Prepared output directories");
        Ok(())
    }
}
