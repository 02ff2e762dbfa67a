//! Turns source blobs into staged artifacts.
//!
//! Audio is hard-linked as `audio/<id>.mp3`. Images are re-encoded as
//! `images/<id>.jpg` plus one `images/<id>-<width>.jpg` per configured width,
//! downscaled with Lanczos3 only when the source is wider than the target.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{ColorType, DynamicImage, ImageReader};
use sm_core::config::{AudioConfig, ImagesConfig};
use sm_core::{DocumentId, Error};

use super::area::StagingArea;

/// What a source blob turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Image,
}

/// One encoded image artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageVariant {
    /// Full-size re-encode.
    Full,
    /// Variant named after a configured target width.
    Width(u32),
}

impl ImageVariant {
    /// Artifact file name for this variant of document `id`.
    pub fn file_name(&self, id: DocumentId) -> String {
        match self {
            Self::Full => format!("{id}.jpg"),
            Self::Width(width) => format!("{id}-{width}.jpg"),
        }
    }
}

/// Artifact file name for staged audio.
pub fn audio_file_name(id: DocumentId) -> String {
    format!("{id}.mp3")
}

/// Result of staging one source blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedItem {
    pub id: DocumentId,
    pub kind: MediaKind,
    /// Every file written into the staging area for this blob.
    pub artifacts: Vec<PathBuf>,
}

/// Stages source blobs into a [`StagingArea`].
pub struct Transcoder<'a> {
    area: &'a StagingArea,
    images: &'a ImagesConfig,
    audio: &'a AudioConfig,
}

impl<'a> Transcoder<'a> {
    pub fn new(area: &'a StagingArea, images: &'a ImagesConfig, audio: &'a AudioConfig) -> Self {
        Self {
            area,
            images,
            audio,
        }
    }

    /// Stage a single blob.
    ///
    /// Fails if the file stem is not an integer, the audio hard link cannot be
    /// created, or the image cannot be decoded or encoded. Artifacts written
    /// before a failure are left in place.
    pub fn stage(&self, path: &Path) -> Result<StagedItem> {
        let id = DocumentId::from_path(path)?;

        let is_audio = path
            .extension()
            .map(|ext| self.audio.is_audio_extension(&ext.to_string_lossy()))
            .unwrap_or(false);

        if is_audio {
            let dest = self.area.audio_dir().join(audio_file_name(id));
            std::fs::hard_link(path, &dest).with_context(|| {
                format!(
                    "Failed to hard-link {} to {}",
                    path.display(),
                    dest.display()
                )
            })?;
            return Ok(StagedItem {
                id,
                kind: MediaKind::Audio,
                artifacts: vec![dest],
            });
        }

        let artifacts = self.stage_image(id, path)?;
        Ok(StagedItem {
            id,
            kind: MediaKind::Image,
            artifacts,
        })
    }

    fn stage_image(&self, id: DocumentId, path: &Path) -> Result<Vec<PathBuf>> {
        let img = ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(Error::from)
            .with_context(|| format!("Failed to open image: {}", path.display()))?
            .decode()
            .map_err(Error::image)
            .with_context(|| format!("Failed to decode image: {}", path.display()))?;

        let img = jpeg_compatible(img);
        let (width, height) = (img.width(), img.height());
        let quality = self.images.quality;

        let mut artifacts = Vec::with_capacity(self.images.widths.len() + 1);

        let full = self.area.images_dir().join(ImageVariant::Full.file_name(id));
        write_jpeg(&img, &full, quality)?;
        artifacts.push(full);

        for &target in &self.images.widths {
            let dest = self
                .area
                .images_dir()
                .join(ImageVariant::Width(target).file_name(id));

            // Only downscale; narrower sources reuse the full-size image.
            if target < width {
                let target_height = scaled_height(width, height, target);
                let resized = img.resize_exact(target, target_height, FilterType::Lanczos3);
                write_jpeg(&resized, &dest, quality)?;
            } else {
                write_jpeg(&img, &dest, quality)?;
            }
            artifacts.push(dest);
        }

        Ok(artifacts)
    }
}

/// Height that keeps the aspect ratio of `width`×`height` at `target_width`,
/// rounded half-to-even and never zero.
pub fn scaled_height(width: u32, height: u32, target_width: u32) -> u32 {
    let scaled = f64::from(target_width) * f64::from(height) / f64::from(width);
    (scaled.round_ties_even() as u32).max(1)
}

/// The JPEG encoder only accepts 8-bit grey or RGB. Palette images arrive
/// expanded to RGB(A); anything with alpha or a wider sample type is flattened
/// to RGB8.
fn jpeg_compatible(img: DynamicImage) -> DynamicImage {
    match img.color() {
        ColorType::L8 | ColorType::Rgb8 => img,
        _ => DynamicImage::ImageRgb8(img.to_rgb8()),
    }
}

fn write_jpeg(img: &DynamicImage, dest: &Path, quality: u8) -> Result<()> {
    let file = File::create(dest)
        .map_err(Error::from)
        .with_context(|| format!("Failed to create image file: {}", dest.display()))?;
    let mut writer = BufWriter::new(file);

    img.write_with_encoder(JpegEncoder::new_with_quality(&mut writer, quality))
        .map_err(Error::image)
        .with_context(|| format!("Failed to encode image: {}", dest.display()))?;

    writer
        .flush()
        .map_err(Error::from)
        .with_context(|| format!("Failed to write image file: {}", dest.display()))?;

    Ok(())
}
