//! Foundation types for thumbstream.
//!
//! Shared by every thumbstream crate: error types, the stream
//! configuration, and decoded image data.

pub mod config;
pub mod error;
pub mod image;

pub use config::{StreamConfig, ThumbnailType};
pub use error::{FetchError, Result, ThumbError};
pub use image::PixelImage;
