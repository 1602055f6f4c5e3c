//! Error handling

use tracing::debug;

/// Errors raised while building a thumbnail.
#[derive(Debug)]
pub enum ThumbError {
    /// A required credential or setting is missing
    Configuration(String),
    /// Requested dimensions exceed what the synthesizer supports
    InvalidResolution {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Largest supported side
        max: u32,
    },
    /// The synthesizer answered, but without a usable image
    NoImageProduced,
    /// Unknown text position keyword
    InvalidPosition(String),
    /// Unknown font size keyword
    InvalidFontSize(String),
    /// A collaborator API returned a non-success status
    Api {
        /// HTTP status code
        status: u16,
        /// Response body, as text
        body: String,
    },
    /// Transport-level HTTP failure
    Http(reqwest::Error),
    /// Image decoding or encoding failed
    Image(image::ImageError),
    /// Filesystem failure
    Io(std::io::Error),
    /// A response payload could not be decoded
    Decode(String),
}

impl std::fmt::Display for ThumbError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration(message) => write!(f, "Configuration error: {message}"),
            Self::InvalidResolution { width, height, .. } if *width == 0 || *height == 0 => {
                write!(f, "Resolution must be at least 1x1, requested {width}x{height}")
            }
            Self::InvalidResolution { width, height, max } => write!(
                f,
                "Maximum resolution supported is {max}x{max}, requested {width}x{height}"
            ),
            Self::NoImageProduced => write!(f, "No image was generated"),
            Self::InvalidPosition(position) => write!(
                f,
                "Invalid position {position:?}. Use 'center', 'top', or 'bottom'"
            ),
            Self::InvalidFontSize(size) => write!(
                f,
                "Invalid font size {size:?}. Use 'small', 'medium', or 'large'"
            ),
            Self::Api { status, body } => write!(f, "API error {status}: {body}"),
            Self::Http(err) => write!(f, "HTTP error: {err}"),
            Self::Image(err) => write!(f, "Image error: {err}"),
            Self::Io(err) => write!(f, "IO error: {err}"),
            Self::Decode(message) => write!(f, "Failed to decode response: {message}"),
        }
    }
}

impl std::error::Error for ThumbError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            Self::Image(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ThumbError {
    fn from(err: std::io::Error) -> Self {
        ThumbError::Io(err)
    }
}

impl From<image::ImageError> for ThumbError {
    fn from(err: image::ImageError) -> Self {
        ThumbError::Image(err)
    }
}

impl From<reqwest::Error> for ThumbError {
    fn from(err: reqwest::Error) -> Self {
        debug!("HTTP transport failure: {:?}", err);
        ThumbError::Http(err)
    }
}

impl From<serde_json::Error> for ThumbError {
    fn from(err: serde_json::Error) -> Self {
        ThumbError::Decode(err.to_string())
    }
}

impl From<base64::DecodeError> for ThumbError {
    fn from(err: base64::DecodeError) -> Self {
        ThumbError::Decode(format!("invalid base64 artifact: {err}"))
    }
}
