use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use thumbcrafter::ThumbCrafter;
use thumbcrafter::analyzer::ContentAnalyzer;
use thumbcrafter::config::setup_logging;
use thumbcrafter::overlay::TextOverlay;
use thumbcrafter::pipeline::save_thumbnail;
use thumbcrafter::providers::{
    FixedClassifier, HuggingFaceClassifier, StabilityClient, ThemeClassifier,
};
use tracing::info;

fn main() -> Result<()> {
    let cli = thumbcrafter::cli::CliOptions::parse();

    let _ = setup_logging(cli.debug);

    let classifier: Box<dyn ThemeClassifier> = if cli.themes.is_empty() {
        Box::new(HuggingFaceClassifier::new(
            cli.hf_api_token.clone(),
            &cli.classifier_model,
        ))
    } else {
        Box::new(FixedClassifier::new(cli.themes.clone()))
    };
    let styles = cli.resolved_styles();

    if cli.dry_run {
        let analyzer = ContentAnalyzer::new(classifier);
        let plans = styles
            .iter()
            .map(|style| analyzer.plan(&cli.title, &cli.summary, *style))
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to analyze content")?;
        println!("{}", serde_json::to_string_pretty(&plans)?);
        return Ok(());
    }

    let synthesizer = StabilityClient::new(cli.stability_api_key.clone())?
        .with_engine(&cli.engine)
        .with_seed(cli.seed);
    let overlay = TextOverlay::new(&cli.font)
        .with_font_size(cli.font_size)
        .with_position(cli.position);
    let crafter = ThumbCrafter::new(classifier, synthesizer).with_overlay(overlay);
    let resolution = (cli.width, cli.height);

    let outputs = if cli.is_batch() {
        let thumbnails = crafter
            .generate_batch(&cli.title, &cli.summary, &styles, resolution)
            .context("Batch generation failed")?;
        styles
            .iter()
            .zip(thumbnails)
            .map(|(style, thumbnail)| (cli.output.join(format!("{style}.png")), thumbnail))
            .collect::<Vec<_>>()
    } else {
        let thumbnail = crafter
            .generate_thumbnail(&cli.title, &cli.summary, styles[0], resolution)
            .context("Thumbnail generation failed")?;
        vec![(cli.output.clone(), thumbnail)]
    };

    for (path, thumbnail) in &outputs {
        save_thumbnail(thumbnail, path)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        if cli.variations > 0 {
            let variations = crafter
                .generate_variations(thumbnail, cli.variations)
                .with_context(|| format!("Variations of {} failed", path.display()))?;
            for (index, variation) in variations.iter().enumerate() {
                let variation_path = variation_path(path, index + 1);
                save_thumbnail(variation, &variation_path)
                    .with_context(|| format!("Failed to write {}", variation_path.display()))?;
            }
        }
    }

    info!("Generated {} thumbnail(s)", outputs.len());
    Ok(())
}

/// `out/thumb.png` -> `out/thumb_variation_1.png`
fn variation_path(path: &Path, number: usize) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "thumbnail".to_string());
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_string())
        .unwrap_or_else(|| "png".to_string());
    path.with_file_name(format!("{stem}_variation_{number}.{extension}"))
}
