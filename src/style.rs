//! Style presets, color schemes and prompt templates.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::warn;

use crate::constants::FALLBACK_COLOR_THEME;

/// An 8-bit RGB triple.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Converts to an opaque `image` pixel.
    pub fn to_rgba(self) -> image::Rgba<u8> {
        self.with_alpha(u8::MAX)
    }

    /// Converts to an `image` pixel with the given alpha.
    pub fn with_alpha(self, alpha: u8) -> image::Rgba<u8> {
        image::Rgba([self.0, self.1, self.2, alpha])
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Rgb(r, g, b)
    }
}

/// Named colors used for text and decorations.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct ColorScheme {
    /// Text color
    pub primary: Rgb,
    /// Borders and secondary decorations
    pub secondary: Rgb,
    /// Only style schemes carry an accent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<Rgb>,
}

impl ColorScheme {
    const fn pair(primary: Rgb, secondary: Rgb) -> Self {
        Self {
            primary,
            secondary,
            accent: None,
        }
    }

    const fn triple(primary: Rgb, secondary: Rgb, accent: Rgb) -> Self {
        Self {
            primary,
            secondary,
            accent: Some(accent),
        }
    }

    /// Scheme for a style name or a theme label; unknown names get the
    /// "technology" theme colors.
    pub fn for_name(name: &str) -> Self {
        let normalized = name.trim().to_ascii_lowercase();
        if let Ok(style) = normalized.parse::<StylePreset>() {
            return style.color_scheme();
        }
        Self::for_theme(&normalized)
    }

    /// Scheme for a theme label, falling back to "technology".
    pub fn for_theme(theme: &str) -> Self {
        match theme {
            "technology" => TECH_BLUE,
            "business" | "finance" => DARK_BLUE,
            "lifestyle" | "art" | "politics" => RED,
            "health" | "travel" | "environment" => GREEN,
            "education" | "fashion" => PURPLE,
            "entertainment" => YELLOW,
            "sports" | "food" => ORANGE,
            "science" => LIGHT_BLUE,
            other => {
                warn!(
                    "No colors for theme {:?}, using {}",
                    other, FALLBACK_COLOR_THEME
                );
                TECH_BLUE
            }
        }
    }
}

const TECH_BLUE: ColorScheme = ColorScheme::pair(Rgb(0, 120, 212), Rgb(0, 153, 204));
const DARK_BLUE: ColorScheme = ColorScheme::pair(Rgb(44, 62, 80), Rgb(52, 73, 94));
const RED: ColorScheme = ColorScheme::pair(Rgb(231, 76, 60), Rgb(192, 57, 43));
const GREEN: ColorScheme = ColorScheme::pair(Rgb(46, 204, 113), Rgb(39, 174, 96));
const PURPLE: ColorScheme = ColorScheme::pair(Rgb(155, 89, 182), Rgb(142, 68, 173));
const YELLOW: ColorScheme = ColorScheme::pair(Rgb(241, 196, 15), Rgb(243, 156, 18));
const ORANGE: ColorScheme = ColorScheme::pair(Rgb(230, 126, 34), Rgb(211, 84, 0));
const LIGHT_BLUE: ColorScheme = ColorScheme::pair(Rgb(52, 152, 219), Rgb(41, 128, 185));

/// Visual treatment for a thumbnail.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StylePreset {
    /// Sleek, with a dark top gradient
    #[default]
    Modern,
    /// Flat, with a thin border
    Minimal,
    /// Boosted colors and a radial vignette
    Vibrant,
    /// Business look, no extra effect
    Corporate,
    /// Artistic look, no extra effect
    Creative,
}

impl StylePreset {
    /// Every preset, in declaration order.
    pub const ALL: [StylePreset; 5] = [
        StylePreset::Modern,
        StylePreset::Minimal,
        StylePreset::Vibrant,
        StylePreset::Corporate,
        StylePreset::Creative,
    ];

    /// Styles used by batch generation when none are given.
    pub const BATCH_DEFAULT: [StylePreset; 3] = [
        StylePreset::Modern,
        StylePreset::Minimal,
        StylePreset::Vibrant,
    ];

    /// Lowercase name of the preset.
    pub fn as_str(self) -> &'static str {
        match self {
            StylePreset::Modern => "modern",
            StylePreset::Minimal => "minimal",
            StylePreset::Vibrant => "vibrant",
            StylePreset::Corporate => "corporate",
            StylePreset::Creative => "creative",
        }
    }

    /// Parses a style name, treating anything unrecognized as modern.
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            warn!("Unknown style {:?}, falling back to modern", name);
            StylePreset::Modern
        })
    }

    /// The style's own color scheme.
    pub fn color_scheme(self) -> ColorScheme {
        match self {
            StylePreset::Modern => ColorScheme::triple(
                Rgb(45, 55, 72),
                Rgb(74, 85, 104),
                Rgb(237, 242, 247),
            ),
            StylePreset::Minimal => ColorScheme::triple(
                Rgb(26, 32, 44),
                Rgb(160, 174, 192),
                Rgb(247, 250, 252),
            ),
            StylePreset::Vibrant => ColorScheme::triple(
                Rgb(220, 38, 38),
                Rgb(251, 191, 36),
                Rgb(16, 185, 129),
            ),
            StylePreset::Corporate => ColorScheme::triple(
                Rgb(30, 64, 175),
                Rgb(71, 85, 105),
                Rgb(241, 245, 249),
            ),
            StylePreset::Creative => ColorScheme::triple(
                Rgb(139, 92, 246),
                Rgb(236, 72, 153),
                Rgb(34, 211, 238),
            ),
        }
    }

    /// Prompt template; `{theme}` marks the substitution slot.
    pub fn prompt_template(self) -> &'static str {
        match self {
            StylePreset::Modern => {
                "modern minimalist {theme} concept, clean design, professional photography, high quality, 4k"
            }
            StylePreset::Minimal => {
                "minimalist {theme} illustration, simple shapes, flat design, pastel colors, clean background"
            }
            StylePreset::Vibrant => {
                "vibrant {theme} scene, bold colors, dynamic composition, eye-catching, professional photography"
            }
            StylePreset::Corporate => {
                "professional {theme} business concept, corporate style, clean design, high-end photography"
            }
            StylePreset::Creative => {
                "creative {theme} concept, artistic composition, unique perspective, professional photography"
            }
        }
    }

    /// Phrase appended after the filled template.
    pub fn prompt_modifier(self) -> &'static str {
        match self {
            StylePreset::Modern => "contemporary design, sleek",
            StylePreset::Minimal => "white space, elegant",
            StylePreset::Vibrant => "saturated colors, energetic",
            StylePreset::Corporate => "business environment, professional",
            StylePreset::Creative => "artistic interpretation, unique",
        }
    }
}

impl fmt::Display for StylePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a style name isn't one of the presets.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UnknownStyle(pub String);

impl fmt::Display for UnknownStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown style preset: {}", self.0)
    }
}

impl std::error::Error for UnknownStyle {}

impl FromStr for StylePreset {
    type Err = UnknownStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StylePreset::ALL
            .into_iter()
            .find(|style| style.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownStyle(s.to_string()))
    }
}

/// Picks black or white text for the given background by relative luminance.
pub fn contrasting_text_color(background: Rgb) -> Rgb {
    let Rgb(r, g, b) = background;
    let luminance = 0.2126 * f64::from(r) / 255.0
        + 0.7152 * f64::from(g) / 255.0
        + 0.0722 * f64::from(b) / 255.0;
    if luminance > 0.5 {
        Rgb(0, 0, 0)
    } else {
        Rgb(255, 255, 255)
    }
}
