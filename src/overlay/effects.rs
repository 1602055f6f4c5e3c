//! Per-style post-processing applied after the text is drawn.

use image::{Pixel, Rgba, RgbaImage};
use tracing::debug;

use crate::style::{ColorScheme, StylePreset};

/// A style effect, applied in place.
pub type Effect = fn(&mut RgbaImage, &ColorScheme);

/// Peak alpha of the gradient and vignette overlays.
const OVERLAY_MAX_ALPHA: f64 = 128.0;

/// Channel multiplier for the vibrant boost.
const SATURATION_FACTOR: f32 = 1.2;

/// Border inset and stroke, as a fraction of image width.
const BORDER_FRACTION: f64 = 0.01;

/// The effect for a style; corporate and creative have none.
pub fn effect_for(style: StylePreset) -> Option<Effect> {
    match style {
        StylePreset::Modern => Some(modern_effect),
        StylePreset::Minimal => Some(minimal_effect),
        StylePreset::Vibrant => Some(vibrant_effect),
        StylePreset::Corporate | StylePreset::Creative => None,
    }
}

fn modern_effect(image: &mut RgbaImage, _colors: &ColorScheme) {
    vertical_gradient(image);
}

fn minimal_effect(image: &mut RgbaImage, colors: &ColorScheme) {
    inset_border(image, colors.secondary.to_rgba());
}

fn vibrant_effect(image: &mut RgbaImage, _colors: &ColorScheme) {
    boost_saturation(image);
    radial_vignette(image);
}

/// Black overlay fading linearly from alpha 128 on the top row to 0.
pub fn vertical_gradient(image: &mut RgbaImage) {
    let height = image.height();
    if height == 0 {
        return;
    }
    for (y, row) in image.enumerate_rows_mut() {
        let alpha = (OVERLAY_MAX_ALPHA * (1.0 - f64::from(y) / f64::from(height))) as u8;
        if alpha == 0 {
            continue;
        }
        let shade = Rgba([0, 0, 0, alpha]);
        for (_, _, pixel) in row {
            pixel.blend(&shade);
        }
    }
}

/// Rectangle outline inset by 1% of the width, stroked inward by the same amount.
pub fn inset_border(image: &mut RgbaImage, color: Rgba<u8>) {
    let (width, height) = image.dimensions();
    let stroke = (f64::from(width) * BORDER_FRACTION) as u32;
    if stroke == 0 {
        debug!("Image too narrow for a border");
        return;
    }
    let (x0, y0) = (stroke, stroke);
    let x1 = width.saturating_sub(stroke);
    let y1 = height.saturating_sub(stroke);
    if x1 < x0 || y1 < y0 {
        return;
    }

    for y in y0..=y1.min(height - 1) {
        for x in x0..=x1.min(width - 1) {
            let on_edge = x < x0 + stroke
                || y < y0 + stroke
                || x + stroke > x1
                || y + stroke > y1;
            if on_edge {
                image.put_pixel(x, y, color);
            }
        }
    }
}

/// Multiplies each color channel by 1.2, clamped to 255.
pub fn boost_pixel(pixel: Rgba<u8>) -> Rgba<u8> {
    let boost = |channel: u8| (f32::from(channel) * SATURATION_FACTOR).min(255.0) as u8;
    Rgba([boost(pixel[0]), boost(pixel[1]), boost(pixel[2]), pixel[3]])
}

/// Applies [`boost_pixel`] to the whole image.
pub fn boost_saturation(image: &mut RgbaImage) {
    for pixel in image.pixels_mut() {
        *pixel = boost_pixel(*pixel);
    }
}

/// Black overlay in concentric rings around the center, alpha 128 at the
/// center falling linearly to 0 at radius `max(cx, cy)`.
pub fn radial_vignette(image: &mut RgbaImage) {
    let (width, height) = image.dimensions();
    let (cx, cy) = (width / 2, height / 2);
    let max_radius = cx.max(cy);
    if max_radius == 0 {
        return;
    }

    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let dx = f64::from(x) - f64::from(cx);
        let dy = f64::from(y) - f64::from(cy);
        let radius = (dx.hypot(dy).round() as u32).max(1);
        if radius > max_radius {
            continue;
        }
        let alpha =
            (OVERLAY_MAX_ALPHA * (1.0 - f64::from(radius) / f64::from(max_radius))) as u8;
        if alpha > 0 {
            pixel.blend(&Rgba([0, 0, 0, alpha]));
        }
    }
}
