//! CLI parser
use std::path::PathBuf;

use clap::Parser;

use crate::constants::{DEFAULT_CLASSIFIER_MODEL, DEFAULT_ENGINE, DEFAULT_FONT, DEFAULT_RESOLUTION};
use crate::overlay::{FontSize, TextPosition};
use crate::style::StylePreset;

#[derive(Parser, Debug)]
#[command(name = "thumbcrafter")]
/// Generate blog thumbnails from a post's title and summary
pub struct CliOptions {
    /// Blog post title, also drawn onto the thumbnail
    pub title: String,

    #[clap(long, short, default_value = "")]
    /// Blog post summary, used for theme detection
    pub summary: String,

    #[clap(long = "style", value_parser = parse_style)]
    /// Style preset; repeat for a batch. Defaults to `modern`, or
    /// modern/minimal/vibrant with `--batch`.
    pub styles: Vec<StylePreset>,

    #[clap(long)]
    /// Generate one thumbnail per style
    pub batch: bool,

    #[clap(long, default_value_t = DEFAULT_RESOLUTION.0)]
    /// Output width in pixels
    pub width: u32,

    #[clap(long, default_value_t = DEFAULT_RESOLUTION.1)]
    /// Output height in pixels
    pub height: u32,

    #[clap(long, short, default_value = "thumbnail.png")]
    /// Output file; in batch mode, a directory receiving `<style>.png`
    pub output: PathBuf,

    #[clap(long, env = "STABILITY_API_KEY", hide_env_values = true)]
    /// Stability API key. Env: STABILITY_API_KEY
    pub stability_api_key: Option<String>,

    #[clap(long, default_value = DEFAULT_ENGINE)]
    /// Generation engine
    pub engine: String,

    #[clap(long, env = "HF_API_TOKEN", hide_env_values = true)]
    /// Hugging Face token for theme classification. Env: HF_API_TOKEN
    pub hf_api_token: Option<String>,

    #[clap(long, default_value = DEFAULT_CLASSIFIER_MODEL)]
    /// Zero-shot classification model
    pub classifier_model: String,

    #[clap(long = "theme")]
    /// Use these themes instead of classifying the content
    pub themes: Vec<String>,

    #[clap(long, default_value = DEFAULT_FONT)]
    /// TrueType font path or file name
    pub font: String,

    #[clap(long, default_value = "medium")]
    /// Font size preset: small, medium or large
    pub font_size: FontSize,

    #[clap(long, default_value = "center")]
    /// Text position: center, top or bottom
    pub position: TextPosition,

    #[clap(long)]
    /// Fixed generation seed
    pub seed: Option<u32>,

    #[clap(long, default_value_t = 0)]
    /// Variations to request for each thumbnail
    pub variations: u32,

    #[clap(long)]
    /// Print the themes, prompt and colors as JSON and exit
    pub dry_run: bool,

    #[clap(long, help = "Enable debug logging", env = "THUMBCRAFTER_DEBUG")]
    /// Enable debug logging. Env: THUMBCRAFTER_DEBUG
    pub debug: bool,
}

impl CliOptions {
    /// Styles to generate, applying the single and batch defaults.
    pub fn resolved_styles(&self) -> Vec<StylePreset> {
        match (self.styles.is_empty(), self.batch) {
            (false, _) => self.styles.clone(),
            (true, true) => StylePreset::BATCH_DEFAULT.to_vec(),
            (true, false) => vec![StylePreset::default()],
        }
    }

    /// Whether output goes to a directory of per-style files.
    pub fn is_batch(&self) -> bool {
        self.batch || self.styles.len() > 1
    }
}

/// Unknown styles fall back to modern rather than failing.
fn parse_style(value: &str) -> Result<StylePreset, std::convert::Infallible> {
    Ok(StylePreset::from_name(value))
}
