//! End-to-end thumbnail generation.

use std::path::Path;

use image::buffer::ConvertBuffer;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};
use tracing::{debug, info};

use crate::analyzer::{ContentAnalyzer, ThumbnailPlan};
use crate::constants::MAX_DIMENSION;
use crate::error::ThumbError;
use crate::overlay::TextOverlay;
use crate::providers::{ImageSynthesizer, ThemeClassifier};
use crate::style::StylePreset;

/// Combines theme extraction, image synthesis and text overlay.
pub struct ThumbCrafter<C, S> {
    analyzer: ContentAnalyzer<C>,
    synthesizer: S,
    overlay: TextOverlay,
}

impl<C: ThemeClassifier, S: ImageSynthesizer> ThumbCrafter<C, S> {
    /// Builds a generator from its two collaborators, with the default overlay.
    pub fn new(classifier: C, synthesizer: S) -> Self {
        Self {
            analyzer: ContentAnalyzer::new(classifier),
            synthesizer,
            overlay: TextOverlay::default(),
        }
    }

    /// Replaces the text overlay settings.
    pub fn with_overlay(mut self, overlay: TextOverlay) -> Self {
        self.overlay = overlay;
        self
    }

    /// Works out themes, prompt and colors without generating anything.
    pub fn plan(
        &self,
        title: &str,
        summary: &str,
        style: StylePreset,
    ) -> Result<ThumbnailPlan, ThumbError> {
        self.analyzer.plan(title, summary, style)
    }

    /// Generates one thumbnail at `resolution` (width, height).
    pub fn generate_thumbnail(
        &self,
        title: &str,
        summary: &str,
        style: StylePreset,
        resolution: (u32, u32),
    ) -> Result<RgbaImage, ThumbError> {
        let (width, height) = resolution;
        validate_target(width, height)?;
        let plan = self.plan(title, summary, style)?;
        let (gen_width, gen_height) = synthesis_size(width, height);
        info!(
            "Generating {} thumbnail for {:?} at {}x{}",
            style, title, width, height
        );

        let mut base = self.synthesizer.generate(&plan.prompt, gen_width, gen_height)?;
        if base.dimensions() != (width, height) {
            debug!(
                "Fitting base image from {:?} to {}x{}",
                base.dimensions(),
                width,
                height
            );
            base = DynamicImage::ImageRgba8(base)
                .resize_to_fill(width, height, FilterType::Lanczos3)
                .into_rgba8();
        }

        Ok(self.overlay.add_text(base, title, &plan.colors, style))
    }

    /// Generates one thumbnail per style, in order. The first failure aborts
    /// the batch. An empty list means modern, minimal and vibrant.
    pub fn generate_batch(
        &self,
        title: &str,
        summary: &str,
        styles: &[StylePreset],
        resolution: (u32, u32),
    ) -> Result<Vec<RgbaImage>, ThumbError> {
        let styles: &[StylePreset] = if styles.is_empty() {
            &StylePreset::BATCH_DEFAULT
        } else {
            styles
        };
        styles
            .iter()
            .map(|style| self.generate_thumbnail(title, summary, *style, resolution))
            .collect()
    }

    /// Asks the synthesizer for variations of a finished image. Oversized
    /// images are squeezed into the synthesis square and stretched back.
    pub fn generate_variations(
        &self,
        image: &RgbaImage,
        count: u32,
    ) -> Result<Vec<RgbaImage>, ThumbError> {
        let (width, height) = image.dimensions();
        validate_target(width, height)?;
        let (gen_width, gen_height) = synthesis_size(width, height);
        if (gen_width, gen_height) == (width, height) {
            return self.synthesizer.generate_variations(image, count);
        }

        let scaled = imageops::resize(image, gen_width, gen_height, FilterType::Lanczos3);
        Ok(self
            .synthesizer
            .generate_variations(&scaled, count)?
            .into_iter()
            .map(|variation| imageops::resize(&variation, width, height, FilterType::Lanczos3))
            .collect())
    }
}

/// Size to request from the synthesizer for a target resolution.
///
/// Targets within the per-call limit pass through. Larger ones are generated
/// as a full-size square and cropped to the target's shape afterwards.
pub fn synthesis_size(width: u32, height: u32) -> (u32, u32) {
    if width <= MAX_DIMENSION && height <= MAX_DIMENSION {
        (width, height)
    } else {
        (MAX_DIMENSION, MAX_DIMENSION)
    }
}

/// Output sizes only need to be non-empty; the upper limit applies to synthesis.
fn validate_target(width: u32, height: u32) -> Result<(), ThumbError> {
    if width == 0 || height == 0 {
        return Err(ThumbError::InvalidResolution {
            width,
            height,
            max: MAX_DIMENSION,
        });
    }
    Ok(())
}

/// Writes a thumbnail, picking the format from the file extension.
pub fn save_thumbnail(image: &RgbaImage, path: &Path) -> Result<(), ThumbError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let format = ImageFormat::from_path(path)?;
    if format == ImageFormat::Jpeg {
        let flattened: RgbImage = image.convert();
        flattened.save_with_format(path, format)?;
    } else {
        image.save_with_format(path, format)?;
    }
    info!("Saved: {}", path.display());
    Ok(())
}
