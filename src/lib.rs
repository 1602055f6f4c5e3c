//! ThumbCrafter: blog thumbnail generation from a title and summary.

#![allow(clippy::multiple_crate_versions)]
#![deny(clippy::all)]
#![deny(clippy::complexity)]
#![deny(clippy::correctness)]
#![deny(clippy::disallowed_methods)]
#![deny(clippy::expect_used)]
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::panic)]
#![deny(clippy::perf)]
#![deny(clippy::trivially_copy_pass_by_ref)]
#![deny(clippy::unreachable)]
#![deny(clippy::unwrap_used)]
#![deny(warnings)]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod overlay;
pub mod pipeline;
pub mod providers;
pub mod style;

pub use analyzer::{ContentAnalyzer, Theme};
pub use error::ThumbError;
pub use overlay::TextOverlay;
pub use pipeline::ThumbCrafter;
pub use style::{ColorScheme, Rgb, StylePreset};
