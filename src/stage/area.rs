//! Staging area layout and lifecycle.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Sub-directory holding hard-linked audio.
pub const AUDIO_DIR: &str = "audio";
/// Sub-directory holding encoded JPEG derivatives.
pub const IMAGES_DIR: &str = "images";

/// The local tree mirrored to the remote host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingArea {
    root: PathBuf,
    audio: PathBuf,
    images: PathBuf,
}

impl StagingArea {
    /// Describe the staging area rooted at `root` without touching the disk.
    pub fn at(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            audio: root.join(AUDIO_DIR),
            images: root.join(IMAGES_DIR),
        }
    }

    /// Delete `root` if it exists, then recreate `root/audio` and
    /// `root/images`. Nothing from a previous run survives.
    pub fn ensure_clean(root: &Path) -> Result<Self> {
        if root.exists() {
            tracing::debug!("Clearing staging area {}", root.display());
            std::fs::remove_dir_all(root)
                .with_context(|| format!("Failed to clear staging area: {}", root.display()))?;
        }

        let area = Self::at(root);
        for dir in [&area.audio, &area.images] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create staging directory: {}", dir.display()))?;
        }

        Ok(area)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn audio_dir(&self) -> &Path {
        &self.audio
    }

    pub fn images_dir(&self) -> &Path {
        &self.images
    }
}

/// List the source blobs in `dir`: regular files only, no recursion, hidden
/// entries skipped, sorted by file name.
pub fn list_blobs(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read blob directory: {}", dir.display()))?;

    let mut blobs = Vec::new();
    for entry in entries {
        let entry =
            entry.with_context(|| format!("Failed to read blob directory: {}", dir.display()))?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }

        let path = entry.path();
        if !path.is_file() {
            tracing::debug!("Skipping non-file blob entry {}", path.display());
            continue;
        }
        blobs.push(path);
    }

    blobs.sort();
    Ok(blobs)
}
