//! Font loading, measurement and glyph drawing.

use std::path::{Path, PathBuf};

use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use image::{Pixel, Rgba, RgbaImage};
use rusttype::{Font, Scale, point};
use tracing::{debug, warn};

use crate::constants::FONT_SEARCH_DIRS;

/// Cell size of the built-in bitmap font.
const BUILTIN_CELL: u32 = 8;

/// Pixel extent of rendered text.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TextSize {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// A TrueType font, or the built-in bitmap font when none could be loaded.
#[derive(Clone)]
pub enum OverlayFont {
    /// Scalable outline font
    TrueType(Font<'static>),
    /// 8x8 bitmap glyphs, scaled by whole pixels
    Builtin,
}

impl std::fmt::Debug for OverlayFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TrueType(font) => write!(f, "TrueType({} glyphs)", font.glyph_count()),
            Self::Builtin => write!(f, "Builtin"),
        }
    }
}

impl OverlayFont {
    /// Loads `name` as a path or from the system font directories, falling
    /// back to the built-in font.
    pub fn load(name: &str) -> Self {
        for candidate in font_candidates(name) {
            let Ok(bytes) = std::fs::read(&candidate) else {
                continue;
            };
            if let Some(font) = Font::try_from_vec(bytes) {
                debug!("Loaded font from {}", candidate.display());
                return Self::TrueType(font);
            }
            warn!("{} is not a usable font", candidate.display());
        }
        warn!("Font {:?} not available, using built-in font", name);
        Self::Builtin
    }

    /// Measures `text` at `px` pixels.
    pub fn measure(&self, text: &str, px: f32) -> TextSize {
        match self {
            Self::TrueType(font) => {
                let scale = Scale::uniform(px);
                let ascent = font.v_metrics(scale).ascent;
                let mut bounds: Option<(i32, i32, i32, i32)> = None;
                for glyph in font.layout(text, scale, point(0.0, ascent)) {
                    if let Some(bb) = glyph.pixel_bounding_box() {
                        bounds = Some(match bounds {
                            None => (bb.min.x, bb.min.y, bb.max.x, bb.max.y),
                            Some((x0, y0, x1, y1)) => (
                                x0.min(bb.min.x),
                                y0.min(bb.min.y),
                                x1.max(bb.max.x),
                                y1.max(bb.max.y),
                            ),
                        });
                    }
                }
                bounds.map_or_else(TextSize::default, |(x0, y0, x1, y1)| TextSize {
                    width: (x1 - x0).unsigned_abs(),
                    height: (y1 - y0).unsigned_abs(),
                })
            }
            Self::Builtin => {
                let cell = BUILTIN_CELL * builtin_scale(px);
                let chars = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
                if chars == 0 {
                    return TextSize::default();
                }
                TextSize {
                    width: chars.saturating_mul(cell),
                    height: cell,
                }
            }
        }
    }

    /// Draws `text` with its top-left at (`x`, `y`), blending `color` by
    /// glyph coverage.
    pub fn draw(&self, image: &mut RgbaImage, text: &str, px: f32, x: i32, y: i32, color: Rgba<u8>) {
        match self {
            Self::TrueType(font) => {
                let scale = Scale::uniform(px);
                let ascent = font.v_metrics(scale).ascent;
                let origin = point(x as f32, y as f32 + ascent);
                for glyph in font.layout(text, scale, origin) {
                    let Some(bb) = glyph.pixel_bounding_box() else {
                        continue;
                    };
                    glyph.draw(|gx, gy, coverage| {
                        let px = i64::from(bb.min.x) + i64::from(gx);
                        let py = i64::from(bb.min.y) + i64::from(gy);
                        blend_at(image, px, py, color, coverage);
                    });
                }
            }
            Self::Builtin => {
                let scale = builtin_scale(px);
                let cell = i64::from(BUILTIN_CELL * scale);
                for (index, ch) in text.chars().enumerate() {
                    let rows = builtin_glyph(ch);
                    let left = i64::from(x) + i64::try_from(index).unwrap_or(i64::MAX / 2) * cell;
                    for (row, bits) in rows.iter().enumerate() {
                        for col in 0..BUILTIN_CELL {
                            if bits & (1 << col) == 0 {
                                continue;
                            }
                            let gx = left + i64::from(col * scale);
                            let gy = i64::from(y) + i64::from(row as u32 * scale);
                            for dy in 0..i64::from(scale) {
                                for dx in 0..i64::from(scale) {
                                    blend_at(image, gx + dx, gy + dy, color, 1.0);
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn builtin_scale(px: f32) -> u32 {
    ((px / BUILTIN_CELL as f32).round() as u32).max(1)
}

fn builtin_glyph(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or_default()
}

fn blend_at(image: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>, coverage: f32) {
    let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
        return;
    };
    if x >= image.width() || y >= image.height() || coverage <= 0.0 {
        return;
    }
    let alpha = (f32::from(color[3]) * coverage.min(1.0)) as u8;
    if alpha == 0 {
        return;
    }
    image
        .get_pixel_mut(x, y)
        .blend(&Rgba([color[0], color[1], color[2], alpha]));
}

fn font_candidates(name: &str) -> Vec<PathBuf> {
    let direct = PathBuf::from(name);
    let mut candidates = vec![direct.clone()];
    let bare = direct.parent().is_none_or(|parent| parent == Path::new(""));
    if bare {
        candidates.extend(FONT_SEARCH_DIRS.iter().map(|dir| Path::new(dir).join(name)));
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_font_falls_back_to_builtin() {
        let font = OverlayFont::load("definitely-not-a-font-file.ttf");
        assert!(matches!(font, OverlayFont::Builtin));
    }

    #[test]
    fn non_font_file_falls_back_to_builtin() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.ttf");
        std::fs::write(&path, b"not a font").expect("write");
        let font = OverlayFont::load(&path.to_string_lossy());
        assert!(matches!(font, OverlayFont::Builtin));
    }

    #[test]
    fn builtin_measure_scales_with_size() {
        let font = OverlayFont::Builtin;
        assert_eq!(
            font.measure("Hi!", 16.0),
            TextSize {
                width: 48,
                height: 16
            }
        );
        assert_eq!(
            font.measure("Hi", 50.0),
            TextSize {
                width: 96,
                height: 48
            }
        );
        assert_eq!(font.measure("", 50.0), TextSize::default());
        assert_eq!(font.measure("a", 1.0).height, 8);
    }

    #[test]
    fn builtin_draw_stays_inside_measured_box() {
        let font = OverlayFont::Builtin;
        let mut image = RgbaImage::from_pixel(64, 32, Rgba([255, 255, 255, 255]));
        let size = font.measure("AB", 16.0);
        font.draw(&mut image, "AB", 16.0, 4, 4, Rgba([255, 0, 0, 255]));

        let mut painted = 0;
        for (x, y, pixel) in image.enumerate_pixels() {
            if pixel.0 == [255, 0, 0, 255] {
                painted += 1;
                assert!(x >= 4 && x < 4 + size.width, "x {x}");
                assert!(y >= 4 && y < 4 + size.height, "y {y}");
            }
        }
        assert!(painted > 0);
    }

    #[test]
    fn drawing_off_canvas_is_clipped() {
        let font = OverlayFont::Builtin;
        let mut image = RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 255]));
        font.draw(&mut image, "WWW", 32.0, -20, -20, Rgba([255, 255, 255, 255]));
        font.draw(&mut image, "WWW", 32.0, 100, 100, Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn bare_names_search_font_dirs() {
        let candidates = font_candidates("arial.ttf");
        assert_eq!(candidates[0], PathBuf::from("arial.ttf"));
        assert!(candidates.len() > 1);
        assert_eq!(font_candidates("/opt/fonts/arial.ttf").len(), 1);
    }
}
