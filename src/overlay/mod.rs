//! Text overlay and style effects for generated images.

use std::str::FromStr;

use image::{Rgba, RgbaImage};
use tracing::debug;

use crate::constants::DEFAULT_FONT;
use crate::error::ThumbError;
use crate::style::{ColorScheme, StylePreset};

pub mod effects;
mod font;

pub use font::{OverlayFont, TextSize};

/// Shadow color; black at roughly half opacity.
const SHADOW: Rgba<u8> = Rgba([0, 0, 0, 128]);

/// Shadow offset as a fraction of the font size.
const SHADOW_OFFSET_FRACTION: f64 = 0.02;

/// Font size relative to image height.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FontSize {
    /// 5% of image height
    Small,
    /// 8% of image height
    #[default]
    Medium,
    /// 12% of image height
    Large,
}

impl FontSize {
    /// Fraction of image height.
    pub fn ratio(self) -> f64 {
        match self {
            FontSize::Small => 0.05,
            FontSize::Medium => 0.08,
            FontSize::Large => 0.12,
        }
    }

    /// Pixel size for an image of the given height.
    pub fn pixels_for(self, image_height: u32) -> u32 {
        (f64::from(image_height) * self.ratio()) as u32
    }
}

impl FromStr for FontSize {
    type Err = ThumbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(FontSize::Small),
            "medium" => Ok(FontSize::Medium),
            "large" => Ok(FontSize::Large),
            _ => Err(ThumbError::InvalidFontSize(s.to_string())),
        }
    }
}

/// Where text goes vertically; always centered horizontally.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TextPosition {
    /// Middle of the image
    #[default]
    Center,
    /// 10% down from the top
    Top,
    /// Ending 10% up from the bottom
    Bottom,
}

impl FromStr for TextPosition {
    type Err = ThumbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "center" => Ok(TextPosition::Center),
            "top" => Ok(TextPosition::Top),
            "bottom" => Ok(TextPosition::Bottom),
            _ => Err(ThumbError::InvalidPosition(s.to_string())),
        }
    }
}

/// Top-left corner for text of `text_size` inside `image_size`.
///
/// Coordinates go negative when the text is larger than the image.
pub fn calculate_text_position(
    image_size: (u32, u32),
    text_size: (u32, u32),
    position: TextPosition,
) -> (i64, i64) {
    let (image_width, image_height) = (i64::from(image_size.0), i64::from(image_size.1));
    let (text_width, text_height) = (i64::from(text_size.0), i64::from(text_size.1));

    let x = (image_width - text_width).div_euclid(2);
    let y = match position {
        TextPosition::Center => (image_height - text_height).div_euclid(2),
        TextPosition::Top => image_height / 10,
        TextPosition::Bottom => image_height * 9 / 10 - text_height,
    };
    (x, y)
}

/// Draws a title and the style's effect onto a base image.
#[derive(Clone, Debug)]
pub struct TextOverlay {
    font: OverlayFont,
    font_size: FontSize,
    position: TextPosition,
}

impl Default for TextOverlay {
    fn default() -> Self {
        Self::new(DEFAULT_FONT)
    }
}

impl TextOverlay {
    /// Uses the named font, or the built-in one if it can't be loaded.
    pub fn new(font_name: &str) -> Self {
        Self::with_font(OverlayFont::load(font_name))
    }

    /// Uses an already loaded font.
    pub fn with_font(font: OverlayFont) -> Self {
        Self {
            font,
            font_size: FontSize::default(),
            position: TextPosition::default(),
        }
    }

    /// Sets the font size preset.
    pub fn with_font_size(mut self, font_size: FontSize) -> Self {
        self.font_size = font_size;
        self
    }

    /// Sets the vertical placement.
    pub fn with_position(mut self, position: TextPosition) -> Self {
        self.position = position;
        self
    }

    /// Renders `text` with a drop shadow in the scheme's primary color, then
    /// applies the style's effect.
    pub fn add_text(
        &self,
        mut image: RgbaImage,
        text: &str,
        colors: &ColorScheme,
        style: StylePreset,
    ) -> RgbaImage {
        let (width, height) = image.dimensions();
        let font_size = self.font_size.pixels_for(height);
        let px = font_size as f32;

        let measured = self.font.measure(text, px);
        let (x, y) = calculate_text_position(
            (width, height),
            (measured.width, measured.height),
            self.position,
        );
        let (x, y) = (clamp_coord(x), clamp_coord(y));
        debug!(
            "Placing {}x{} text at ({}, {}) with font size {}",
            measured.width, measured.height, x, y, font_size
        );

        let shadow_offset = (f64::from(font_size) * SHADOW_OFFSET_FRACTION) as i32;
        self.font.draw(
            &mut image,
            text,
            px,
            x.saturating_add(shadow_offset),
            y.saturating_add(shadow_offset),
            SHADOW,
        );
        self.font
            .draw(&mut image, text, px, x, y, colors.primary.to_rgba());

        if let Some(effect) = effects::effect_for(style) {
            debug!("Applying {} effect", style);
            effect(&mut image, colors);
        }
        image
    }
}

fn clamp_coord(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}
