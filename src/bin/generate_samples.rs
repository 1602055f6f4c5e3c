//! Generate thumbnails, plus two variations each, for a few sample posts.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use thumbcrafter::config::setup_logging;
use thumbcrafter::constants::{DEFAULT_CLASSIFIER_MODEL, DEFAULT_RESOLUTION};
use thumbcrafter::pipeline::save_thumbnail;
use thumbcrafter::providers::{HuggingFaceClassifier, StabilityClient};
use thumbcrafter::{StylePreset, ThumbCrafter};

#[derive(Parser, Debug)]
#[command(name = "generate_samples")]
#[command(about = "Render sample thumbnails for three demo blog posts")]
struct Args {
    /// Stability API key
    #[arg(long, env = "STABILITY_API_KEY", hide_env_values = true)]
    stability_api_key: Option<String>,

    /// Hugging Face token used for theme classification
    #[arg(long, env = "HF_API_TOKEN", hide_env_values = true)]
    hf_api_token: Option<String>,

    /// Where the thumbnails are written
    #[arg(long, default_value = "./sample_thumbnails")]
    out_dir: PathBuf,

    /// Variations generated per thumbnail
    #[arg(long, default_value_t = 2)]
    variations: u32,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

struct SamplePost {
    title: &'static str,
    summary: &'static str,
    style: StylePreset,
}

const SAMPLE_POSTS: [SamplePost; 3] = [
    SamplePost {
        title: "The Future of Artificial Intelligence",
        summary: "Exploring the latest developments in AI and their impact on society",
        style: StylePreset::Modern,
    },
    SamplePost {
        title: "10 Tips for Better Productivity",
        summary: "Simple yet effective strategies to boost your daily productivity",
        style: StylePreset::Minimal,
    },
    SamplePost {
        title: "The Art of Photography",
        summary: "Master the fundamentals of photography and take stunning pictures",
        style: StylePreset::Vibrant,
    },
];

fn main() -> Result<()> {
    let args = Args::parse();
    let _ = setup_logging(args.debug);

    let crafter = ThumbCrafter::new(
        HuggingFaceClassifier::new(args.hf_api_token, DEFAULT_CLASSIFIER_MODEL),
        StabilityClient::new(args.stability_api_key)?,
    );

    for (index, post) in SAMPLE_POSTS.iter().enumerate() {
        let number = index + 1;
        println!("Generating thumbnail for: {}", post.title);
        let thumbnail = crafter
            .generate_thumbnail(post.title, post.summary, post.style, DEFAULT_RESOLUTION)
            .with_context(|| format!("Failed to generate {:?}", post.title))?;

        let output_path = args.out_dir.join(format!("thumbnail_{number}.png"));
        save_thumbnail(&thumbnail, &output_path)?;
        println!("Saved to: {}", output_path.display());

        let variations = crafter
            .generate_variations(&thumbnail, args.variations)
            .with_context(|| format!("Failed to generate variations of {:?}", post.title))?;
        for (variation_index, variation) in variations.iter().enumerate() {
            let variation_path = args.out_dir.join(format!(
                "thumbnail_{number}_variation_{}.png",
                variation_index + 1
            ));
            save_thumbnail(variation, &variation_path)?;
            println!("Saved variation to: {}", variation_path.display());
        }
    }

    println!("\nAll thumbnails generated successfully!");
    Ok(())
}
