//! Theme extraction and prompt building.

use serde::Serialize;
use tracing::{debug, info};

use crate::constants::{
    CANDIDATE_THEMES, FALLBACK_COLOR_THEME, FALLBACK_PROMPT_THEME, MAX_THEMES,
    THEME_CONFIDENCE_THRESHOLD,
};
use crate::error::ThumbError;
use crate::providers::{Classification, ThemeClassifier};
use crate::style::{ColorScheme, StylePreset};

/// A topic label with the classifier's confidence.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Theme {
    /// Label, e.g. "technology"
    pub name: String,
    /// Confidence in `[0, 1]`
    pub score: f32,
}

impl Theme {
    /// Creates a theme.
    pub fn new(name: impl Into<String>, score: f32) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// Everything decided before the synthesizer is called.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ThumbnailPlan {
    /// Style the plan was built for
    pub style: StylePreset,
    /// Themes kept after filtering
    pub themes: Vec<Theme>,
    /// Prompt for the synthesizer
    pub prompt: String,
    /// Colors for the text and decorations
    pub colors: ColorScheme,
}

/// Keeps confident themes, at most [`MAX_THEMES`], in provider order.
pub fn filter_themes(classification: Classification) -> Vec<Theme> {
    classification
        .labels
        .into_iter()
        .zip(classification.scores)
        .filter(|(_, score)| *score > THEME_CONFIDENCE_THRESHOLD)
        .take(MAX_THEMES)
        .map(|(name, score)| Theme { name, score })
        .collect()
}

/// The highest-scoring theme; the earlier one wins a tie.
fn leading_theme(themes: &[Theme]) -> Option<&Theme> {
    themes
        .iter()
        .reduce(|best, theme| if theme.score > best.score { theme } else { best })
}

/// Builds the generation prompt from the highest-scoring theme and the style.
pub fn build_prompt(title: &str, themes: &[Theme], style: StylePreset) -> String {
    let main_theme =
        leading_theme(themes).map_or(FALLBACK_PROMPT_THEME, |theme| theme.name.as_str());
    let prompt = format!(
        "{}, {}",
        style.prompt_template().replace("{theme}", main_theme),
        style.prompt_modifier()
    );
    debug!("Prompt for {:?} ({}): {}", title, style, prompt);
    prompt
}

/// Colors for the highest-scoring theme, or the "technology" colors without one.
pub fn color_scheme_for_themes(themes: &[Theme]) -> ColorScheme {
    let primary_theme =
        leading_theme(themes).map_or(FALLBACK_COLOR_THEME, |theme| theme.name.as_str());
    ColorScheme::for_theme(primary_theme)
}

/// Extracts themes from blog content via an injected classifier.
#[derive(Clone, Debug)]
pub struct ContentAnalyzer<C> {
    classifier: C,
}

impl<C: ThemeClassifier> ContentAnalyzer<C> {
    /// Wraps a classifier.
    pub fn new(classifier: C) -> Self {
        Self { classifier }
    }

    /// Returns the top themes for a post's title and summary.
    pub fn analyze(&self, title: &str, summary: &str) -> Result<Vec<Theme>, ThumbError> {
        let content = format!("{title} {summary}");
        let classification = self.classifier.classify(&content, &CANDIDATE_THEMES)?;
        let themes = filter_themes(classification);
        info!(
            "Themes for {:?}: {:?}",
            title,
            themes.iter().map(|theme| &theme.name).collect::<Vec<_>>()
        );
        Ok(themes)
    }

    /// Analyzes the content and derives the prompt and colors for `style`.
    pub fn plan(
        &self,
        title: &str,
        summary: &str,
        style: StylePreset,
    ) -> Result<ThumbnailPlan, ThumbError> {
        let themes = self.analyze(title, summary)?;
        let colors = color_scheme_for_themes(&themes);
        let prompt = build_prompt(title, &themes, style);
        Ok(ThumbnailPlan {
            style,
            themes,
            prompt,
            colors,
        })
    }
}
