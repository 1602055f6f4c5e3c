use std::cell::RefCell;

use image::{Rgba, RgbaImage};
use thumbcrafter::overlay::{OverlayFont, TextOverlay};
use thumbcrafter::pipeline::save_thumbnail;
use thumbcrafter::providers::{
    Classification, FixedClassifier, ImageSynthesizer, ThemeClassifier,
};
use thumbcrafter::{StylePreset, ThumbCrafter, ThumbError, config::setup_logging};

const BASE: Rgba<u8> = Rgba([90, 90, 90, 255]);

/// Records every request and answers with a flat gray image.
#[derive(Default)]
struct FakeSynthesizer {
    requests: RefCell<Vec<(String, u32, u32)>>,
    variation_requests: RefCell<Vec<(u32, u32, u32)>>,
    fail_when_prompt_starts_with: Option<&'static str>,
    produce_nothing: bool,
}

impl ImageSynthesizer for FakeSynthesizer {
    fn generate(&self, prompt: &str, width: u32, height: u32) -> Result<RgbaImage, ThumbError> {
        self.requests
            .borrow_mut()
            .push((prompt.to_string(), width, height));
        if self
            .fail_when_prompt_starts_with
            .is_some_and(|prefix| prompt.starts_with(prefix))
        {
            return Err(ThumbError::Api {
                status: 500,
                body: "boom".to_string(),
            });
        }
        if self.produce_nothing {
            return Err(ThumbError::NoImageProduced);
        }
        Ok(RgbaImage::from_pixel(width, height, BASE))
    }

    fn generate_variations(
        &self,
        image: &RgbaImage,
        count: u32,
    ) -> Result<Vec<RgbaImage>, ThumbError> {
        self.variation_requests
            .borrow_mut()
            .push((image.width(), image.height(), count));
        Ok((0..count).map(|_| image.clone()).collect())
    }
}

struct FailingClassifier;

impl ThemeClassifier for FailingClassifier {
    fn classify(&self, _text: &str, _labels: &[&str]) -> Result<Classification, ThumbError> {
        Err(ThumbError::Api {
            status: 503,
            body: "Model is currently loading".to_string(),
        })
    }
}

struct UnsureClassifier;

impl ThemeClassifier for UnsureClassifier {
    fn classify(&self, _text: &str, labels: &[&str]) -> Result<Classification, ThumbError> {
        assert_eq!(labels.len(), 15);
        Ok(Classification {
            labels: vec!["science".to_string(), "art".to_string()],
            scores: vec![0.2, 0.1],
        })
    }
}

fn crafter<C: ThemeClassifier>(
    classifier: C,
    synthesizer: &FakeSynthesizer,
) -> ThumbCrafter<C, &FakeSynthesizer> {
    let _ = setup_logging(true);
    ThumbCrafter::new(classifier, synthesizer)
        .with_overlay(TextOverlay::with_font(OverlayFont::Builtin))
}

#[test]
fn thumbnail_at_supported_size_goes_straight_through() {
    let synthesizer = FakeSynthesizer::default();
    let crafter = crafter(FixedClassifier::new(["technology"]), &synthesizer);

    let thumbnail = crafter
        .generate_thumbnail("AI today", "", StylePreset::Corporate, (1024, 576))
        .expect("generate");

    assert_eq!(thumbnail.dimensions(), (1024, 576));
    let requests = synthesizer.requests.borrow();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].1, 1024);
    assert_eq!(requests[0].2, 576);
    assert!(requests[0].0.starts_with("professional technology business concept"));
    // technology primary is (0, 120, 212)
    assert!(thumbnail.pixels().any(|pixel| pixel.0 == [0, 120, 212, 255]));
}

#[test]
fn large_thumbnail_is_generated_square_then_cropped() {
    let synthesizer = FakeSynthesizer::default();
    let crafter = crafter(FixedClassifier::new(["food"]), &synthesizer);

    let thumbnail = crafter
        .generate_thumbnail("Pasta", "Fresh pasta at home", StylePreset::Creative, (1200, 630))
        .expect("generate");

    assert_eq!(thumbnail.dimensions(), (1200, 630));
    let requests = synthesizer.requests.borrow();
    assert_eq!((requests[0].1, requests[0].2), (1024, 1024));
    let corner = thumbnail.get_pixel(0, 0)[0];
    assert!((89..=91).contains(&corner), "{corner}");
}

#[test]
fn unconfident_themes_fall_back_to_general() {
    let synthesizer = FakeSynthesizer::default();
    let crafter = crafter(UnsureClassifier, &synthesizer);

    let plan = crafter
        .plan("Something", "Vague", StylePreset::Modern)
        .expect("plan");
    assert!(plan.themes.is_empty());
    assert_eq!(
        plan.prompt,
        "modern minimalist general concept, clean design, professional photography, high quality, 4k, contemporary design, sleek"
    );
    assert_eq!(plan.colors.primary, thumbcrafter::Rgb(0, 120, 212));
    assert!(synthesizer.requests.borrow().is_empty());
}

#[test]
fn batch_keeps_style_order() {
    let synthesizer = FakeSynthesizer::default();
    let crafter = crafter(FixedClassifier::new(["health"]), &synthesizer);
    let styles = [StylePreset::Vibrant, StylePreset::Modern, StylePreset::Minimal];

    let thumbnails = crafter
        .generate_batch("Sleep better", "", &styles, (400, 200))
        .expect("batch");

    assert_eq!(thumbnails.len(), 3);
    let prompts: Vec<String> = synthesizer
        .requests
        .borrow()
        .iter()
        .map(|(prompt, _, _)| prompt.clone())
        .collect();
    assert!(prompts[0].starts_with("vibrant health"));
    assert!(prompts[1].starts_with("modern minimalist health"));
    assert!(prompts[2].starts_with("minimalist health"));

    // vibrant boosts the base, modern darkens the top, minimal draws a border
    assert_eq!(thumbnails[0].get_pixel(0, 0).0, [108, 108, 108, 255]);
    assert!(thumbnails[1].get_pixel(0, 0)[0] < BASE[0]);
    assert_eq!(thumbnails[2].get_pixel(4, 100).0, [39, 174, 96, 255]);
}

#[test]
fn empty_batch_uses_default_styles() {
    let synthesizer = FakeSynthesizer::default();
    let crafter = crafter(FixedClassifier::new(["art"]), &synthesizer);

    let thumbnails = crafter
        .generate_batch("Brushes", "", &[], (256, 256))
        .expect("batch");

    assert_eq!(thumbnails.len(), 3);
    let requests = synthesizer.requests.borrow();
    assert!(requests[0].0.starts_with("modern"));
    assert!(requests[1].0.starts_with("minimalist"));
    assert!(requests[2].0.starts_with("vibrant"));
}

#[test]
fn batch_aborts_on_first_failure() {
    let synthesizer = FakeSynthesizer {
        fail_when_prompt_starts_with: Some("minimalist"),
        ..Default::default()
    };
    let crafter = crafter(FixedClassifier::new(["travel"]), &synthesizer);

    let result = crafter.generate_batch(
        "Lisbon",
        "",
        &[StylePreset::Modern, StylePreset::Minimal, StylePreset::Vibrant],
        (256, 256),
    );

    assert!(matches!(result, Err(ThumbError::Api { status: 500, .. })));
    assert_eq!(synthesizer.requests.borrow().len(), 2);
}

#[test]
fn classifier_failure_stops_before_synthesis() {
    let synthesizer = FakeSynthesizer::default();
    let crafter = crafter(FailingClassifier, &synthesizer);

    let result = crafter.generate_thumbnail("Title", "", StylePreset::Modern, (256, 256));
    assert!(matches!(result, Err(ThumbError::Api { status: 503, .. })));
    assert!(synthesizer.requests.borrow().is_empty());
}

#[test]
fn missing_image_is_reported() {
    let synthesizer = FakeSynthesizer {
        produce_nothing: true,
        ..Default::default()
    };
    let crafter = crafter(FixedClassifier::new(["science"]), &synthesizer);

    let result = crafter.generate_thumbnail("Title", "", StylePreset::Modern, (256, 256));
    assert!(matches!(result, Err(ThumbError::NoImageProduced)));
}

#[test]
fn variations_are_requested_within_limits() {
    let synthesizer = FakeSynthesizer::default();
    let crafter = crafter(FixedClassifier::new(["science"]), &synthesizer);
    let image = RgbaImage::from_pixel(1200, 630, BASE);

    let variations = crafter.generate_variations(&image, 2).expect("variations");

    assert_eq!(variations.len(), 2);
    assert!(variations.iter().all(|v| v.dimensions() == (1200, 630)));
    assert_eq!(
        *synthesizer.variation_requests.borrow(),
        vec![(1024, 1024, 2)]
    );
}

#[test]
fn empty_target_is_rejected_before_any_call() {
    let synthesizer = FakeSynthesizer::default();
    let crafter = crafter(FailingClassifier, &synthesizer);

    let result = crafter.generate_thumbnail("Wide", "", StylePreset::Modern, (5000, 0));
    assert!(matches!(
        result,
        Err(ThumbError::InvalidResolution {
            width: 5000,
            height: 0,
            ..
        })
    ));
    assert!(synthesizer.requests.borrow().is_empty());

    let variations = crafter.generate_variations(&RgbaImage::new(0, 0), 2);
    assert!(matches!(variations, Err(ThumbError::InvalidResolution { .. })));
    assert!(synthesizer.variation_requests.borrow().is_empty());
}

#[test]
fn generated_thumbnail_can_be_saved() {
    let synthesizer = FakeSynthesizer::default();
    let crafter = crafter(FixedClassifier::new(["education"]), &synthesizer);
    let dir = tempfile::tempdir().expect("tempdir");

    let thumbnail = crafter
        .generate_thumbnail("Learn Rust", "", StylePreset::Minimal, (320, 180))
        .expect("generate");
    let path = dir.path().join("out").join("thumbnail.png");
    save_thumbnail(&thumbnail, &path).expect("save");

    let reloaded = image::open(&path).expect("reopen").to_rgba8();
    assert_eq!(reloaded, thumbnail);
}
