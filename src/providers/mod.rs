//! External collaborators: theme classification and image synthesis.
//!
//! The deterministic core only sees the two traits here, so tests can swap in
//! fakes for the hosted models.

use image::RgbaImage;

use crate::constants::MAX_DIMENSION;
use crate::error::ThumbError;

mod fixed;
mod huggingface;
mod stability;

pub use fixed::FixedClassifier;
pub use huggingface::HuggingFaceClassifier;
pub use stability::StabilityClient;

/// Labels and scores returned by a classifier, in provider order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Classification {
    /// Candidate labels, highest score first
    pub labels: Vec<String>,
    /// Scores in `[0, 1]`, parallel to `labels`
    pub scores: Vec<f32>,
}

/// Scores free text against a list of candidate labels.
pub trait ThemeClassifier {
    /// Classifies `text` against `candidate_labels`.
    fn classify(&self, text: &str, candidate_labels: &[&str])
    -> Result<Classification, ThumbError>;
}

/// Turns prompts into raster images.
pub trait ImageSynthesizer {
    /// Generates one image of `width` x `height` for `prompt`.
    fn generate(&self, prompt: &str, width: u32, height: u32) -> Result<RgbaImage, ThumbError>;

    /// Generates up to `count` variations of `image`.
    fn generate_variations(
        &self,
        image: &RgbaImage,
        count: u32,
    ) -> Result<Vec<RgbaImage>, ThumbError>;
}

impl<T: ThemeClassifier + ?Sized> ThemeClassifier for &T {
    fn classify(
        &self,
        text: &str,
        candidate_labels: &[&str],
    ) -> Result<Classification, ThumbError> {
        (**self).classify(text, candidate_labels)
    }
}

impl<T: ImageSynthesizer + ?Sized> ImageSynthesizer for &T {
    fn generate(&self, prompt: &str, width: u32, height: u32) -> Result<RgbaImage, ThumbError> {
        (**self).generate(prompt, width, height)
    }

    fn generate_variations(
        &self,
        image: &RgbaImage,
        count: u32,
    ) -> Result<Vec<RgbaImage>, ThumbError> {
        (**self).generate_variations(image, count)
    }
}

impl<T: ThemeClassifier + ?Sized> ThemeClassifier for Box<T> {
    fn classify(
        &self,
        text: &str,
        candidate_labels: &[&str],
    ) -> Result<Classification, ThumbError> {
        (**self).classify(text, candidate_labels)
    }
}

/// Rejects sizes the synthesizer can't produce in one call.
pub fn validate_resolution(width: u32, height: u32) -> Result<(), ThumbError> {
    if width > MAX_DIMENSION || height > MAX_DIMENSION || width == 0 || height == 0 {
        return Err(ThumbError::InvalidResolution {
            width,
            height,
            max: MAX_DIMENSION,
        });
    }
    Ok(())
}
