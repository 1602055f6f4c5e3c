//! Shared constants for generation, analysis and overlay
//!

/// Environment variable holding the Stability API key
pub const STABILITY_API_KEY_ENV: &str = "STABILITY_API_KEY";

/// Environment variable holding the Hugging Face inference token
pub const HF_API_TOKEN_ENV: &str = "HF_API_TOKEN";

/// Base URL for the Stability REST API
pub const STABILITY_API_HOST: &str = "https://api.stability.ai";

/// Engine used for text-to-image and image-to-image requests
pub const DEFAULT_ENGINE: &str = "stable-diffusion-xl-1024-v1-0";

/// Base URL for hosted Hugging Face inference models
pub const HF_INFERENCE_HOST: &str = "https://router.huggingface.co/hf-inference/models";

/// Zero-shot classification model used for theme extraction
pub const DEFAULT_CLASSIFIER_MODEL: &str = "facebook/bart-large-mnli";

/// Largest width or height the synthesizer accepts in one call.
pub const MAX_DIMENSION: u32 = 1024;

/// Diffusion steps per request
pub const GENERATION_STEPS: u32 = 30;

/// Classifier-free guidance scale
pub const CFG_SCALE: f32 = 7.0;

/// Sampling algorithm name as the API expects it
pub const SAMPLER: &str = "K_DPMPP_2M";

/// Prompt sent along with an init image when asking for variations
pub const VARIATION_PROMPT: &str =
    "variation of the provided image, maintaining style and composition";

/// How much of the init image's schedule is retained for variations.
pub const VARIATION_STEP_SCHEDULE_START: f32 = 0.6;

/// Themes at or below this confidence are dropped.
pub const THEME_CONFIDENCE_THRESHOLD: f32 = 0.3;

/// How many themes survive filtering
pub const MAX_THEMES: usize = 3;

/// Theme used for the prompt when none were found
pub const FALLBACK_PROMPT_THEME: &str = "general";

/// Theme whose colors are used when none were found
pub const FALLBACK_COLOR_THEME: &str = "technology";

/// Labels offered to the zero-shot classifier
pub const CANDIDATE_THEMES: [&str; 15] = [
    "technology",
    "business",
    "lifestyle",
    "health",
    "education",
    "entertainment",
    "sports",
    "science",
    "art",
    "food",
    "travel",
    "fashion",
    "finance",
    "environment",
    "politics",
];

/// Default output resolution, matching common social preview cards.
pub const DEFAULT_RESOLUTION: (u32, u32) = (1200, 630);

/// Font looked up for text overlays
pub const DEFAULT_FONT: &str = "arial.ttf";

/// Directories searched when a font is given by bare file name.
pub const FONT_SEARCH_DIRS: &[&str] = &[
    "/usr/share/fonts/truetype/msttcorefonts",
    "/usr/share/fonts/truetype/dejavu",
    "/usr/share/fonts/TTF",
    "/usr/share/fonts",
    "/usr/local/share/fonts",
    "/Library/Fonts",
    "/System/Library/Fonts/Supplemental",
    "C:\\Windows\\Fonts",
];
