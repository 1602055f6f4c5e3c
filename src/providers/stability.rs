use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose;
use image::{ImageFormat, RgbaImage};
use reqwest::blocking::multipart::{Form, Part};
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{ImageSynthesizer, validate_resolution};
use crate::constants::{
    CFG_SCALE, DEFAULT_ENGINE, GENERATION_STEPS, SAMPLER, STABILITY_API_HOST,
    STABILITY_API_KEY_ENV, VARIATION_PROMPT, VARIATION_STEP_SCHEDULE_START,
};
use crate::error::ThumbError;

/// Image synthesizer backed by the Stability REST generation API.
#[derive(Clone)]
pub struct StabilityClient {
    client: reqwest::blocking::Client,
    api_key: String,
    host: String,
    engine: String,
    seed: Option<u32>,
}

impl std::fmt::Debug for StabilityClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StabilityClient")
            .field("host", &self.host)
            .field("engine", &self.engine)
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

/// Request body for POST /v1/generation/{engine}/text-to-image
#[derive(Serialize, Debug)]
struct TextToImageRequest<'a> {
    text_prompts: [TextPrompt<'a>; 1],
    cfg_scale: f32,
    width: u32,
    height: u32,
    samples: u32,
    steps: u32,
    sampler: &'a str,
    seed: u32,
}

#[derive(Serialize, Debug)]
struct TextPrompt<'a> {
    text: &'a str,
    weight: f32,
}

#[derive(Deserialize, Debug)]
struct GenerationResponse {
    #[serde(default)]
    artifacts: Vec<Artifact>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Artifact {
    #[serde(default)]
    base64: Option<String>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    finish_reason: Option<String>,
}

impl StabilityClient {
    /// Creates a client. Without an explicit key, `STABILITY_API_KEY` is read
    /// from the environment; a missing key is a configuration error.
    pub fn new(api_key: Option<String>) -> Result<Self, ThumbError> {
        let api_key = resolve_api_key(api_key, std::env::var(STABILITY_API_KEY_ENV).ok())?;

        Ok(Self {
            client: reqwest::blocking::Client::new(),
            api_key,
            host: STABILITY_API_HOST.to_string(),
            engine: DEFAULT_ENGINE.to_string(),
            seed: None,
        })
    }

    /// Uses a different generation engine.
    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = engine.into();
        self
    }

    /// Sends requests to a different API host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into().trim_end_matches('/').to_string();
        self
    }

    /// Fixes the seed; otherwise each request gets a random one.
    pub fn with_seed(mut self, seed: Option<u32>) -> Self {
        self.seed = seed;
        self
    }

    fn endpoint(&self, operation: &str) -> String {
        format!("{}/v1/generation/{}/{}", self.host, self.engine, operation)
    }

    fn next_seed(&self) -> u32 {
        self.seed.unwrap_or_else(rand::random::<u32>)
    }

    fn read_artifacts(
        &self,
        response: reqwest::blocking::Response,
    ) -> Result<Vec<RgbaImage>, ThumbError> {
        let status = response.status();
        let bytes = response.bytes()?;
        if !status.is_success() {
            return Err(ThumbError::Api {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).to_string(),
            });
        }
        decode_artifacts(&bytes)
    }
}

impl ImageSynthesizer for StabilityClient {
    fn generate(&self, prompt: &str, width: u32, height: u32) -> Result<RgbaImage, ThumbError> {
        validate_resolution(width, height)?;

        let seed = self.next_seed();
        let body = TextToImageRequest {
            text_prompts: [TextPrompt {
                text: prompt,
                weight: 1.0,
            }],
            cfg_scale: CFG_SCALE,
            width,
            height,
            samples: 1,
            steps: GENERATION_STEPS,
            sampler: SAMPLER,
            seed,
        };

        info!(
            "Requesting {}x{} image from {} (seed {})",
            width, height, self.engine, seed
        );
        let response = self
            .client
            .post(self.endpoint("text-to-image"))
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/json")
            .json(&body)
            .send()?;

        self.read_artifacts(response)?
            .into_iter()
            .next()
            .ok_or(ThumbError::NoImageProduced)
    }

    fn generate_variations(
        &self,
        image: &RgbaImage,
        count: u32,
    ) -> Result<Vec<RgbaImage>, ThumbError> {
        validate_resolution(image.width(), image.height())?;
        if count == 0 {
            return Ok(Vec::new());
        }

        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        let init_image = Part::bytes(png)
            .file_name("init_image.png")
            .mime_str("image/png")?;

        let seed = self.next_seed();
        let form = Form::new()
            .part("init_image", init_image)
            .text("init_image_mode", "STEP_SCHEDULE")
            .text(
                "step_schedule_start",
                VARIATION_STEP_SCHEDULE_START.to_string(),
            )
            .text("text_prompts[0][text]", VARIATION_PROMPT)
            .text("text_prompts[0][weight]", "1")
            .text("cfg_scale", CFG_SCALE.to_string())
            .text("samples", count.to_string())
            .text("steps", GENERATION_STEPS.to_string())
            .text("sampler", SAMPLER)
            .text("seed", seed.to_string());

        info!(
            "Requesting {} variation(s) of a {}x{} image (seed {})",
            count,
            image.width(),
            image.height(),
            seed
        );
        let response = self
            .client
            .post(self.endpoint("image-to-image"))
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/json")
            .multipart(form)
            .send()?;

        let variations = self.read_artifacts(response)?;
        if variations.is_empty() {
            return Err(ThumbError::NoImageProduced);
        }
        Ok(variations)
    }
}

/// Picks the explicit key, else the environment's; blank keys count as missing.
fn resolve_api_key(
    explicit: Option<String>,
    from_env: Option<String>,
) -> Result<String, ThumbError> {
    explicit
        .or(from_env)
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            ThumbError::Configuration(format!(
                "Stability API key is required. Set {STABILITY_API_KEY_ENV} environment variable or pass an API key."
            ))
        })
}

/// Decodes every successful image artifact in a generation response.
fn decode_artifacts(bytes: &[u8]) -> Result<Vec<RgbaImage>, ThumbError> {
    let parsed: GenerationResponse = serde_json::from_slice(bytes)?;
    let mut images = Vec::with_capacity(parsed.artifacts.len());
    for artifact in parsed.artifacts {
        let reason = artifact.finish_reason.as_deref().unwrap_or("SUCCESS");
        if reason != "SUCCESS" {
            warn!(
                "Skipping artifact with finish reason {} (seed {:?})",
                reason, artifact.seed
            );
            continue;
        }
        let Some(encoded) = artifact.base64 else {
            debug!("Skipping artifact without image data");
            continue;
        };
        let raw = general_purpose::STANDARD.decode(encoded)?;
        images.push(image::load_from_memory(&raw)?.to_rgba8());
    }
    Ok(images)
}
