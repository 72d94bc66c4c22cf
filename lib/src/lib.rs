//! ASCII Loom - deterministic image to ASCII art pipeline
//!
//! This library converts a rasterized RGBA buffer into a character grid
//! whose glyphs encode luminance, edges, or contours of the source:
//! tone mapping, optional Sobel/DoG edge extraction, four dithering
//! algorithms and ramp-based glyph selection, composed into a single
//! configurable pipeline.
//!
//! # Example
//! ```no_run
//! use ascii_loom::{ConversionConfig, convert};
//! use image;
//!
//! let input = image::open("photo.jpg").unwrap().to_rgba8();
//! let config = ConversionConfig::default();
//! let text = convert(&input, &config).unwrap();
//! print!("{}", text);
//! ```

pub mod charset;
pub mod config;
pub mod dither;
pub mod edges;
pub mod error;
pub mod kernel;
pub mod processor;
pub mod tone;

// Re-export main types for convenience
pub use charset::Charset;
pub use config::{ConversionConfig, DitherAlgorithm, EdgeMethod};
pub use error::ConvertError;
pub use processor::{convert, convert_rgba_bytes};
