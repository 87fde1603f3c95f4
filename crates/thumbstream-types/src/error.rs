//! Error types for thumbstream.

use std::io;

/// Errors produced while setting up the thumbnail cache.
///
/// The per-frame streaming path never returns these: fetch failures fold
/// into a `Missing` thumbnail instead (see [`FetchError`]).
#[derive(Debug, thiserror::Error)]
pub enum ThumbError {
    #[error("config error: {0}")]
    Config(String),

    #[error("playlist error: {0}")]
    Playlist(String),

    #[error("backend error: {0}")]
    Backend(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ThumbError>;

/// Why a fetch backend could not produce an image.
///
/// Every variant is treated identically by the scheduler: the slot
/// becomes `Missing` and a placeholder is drawn.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("thumbnail not found")]
    NotFound,

    #[error("unsupported image format: {0}")]
    Unsupported(String),

    #[error("decode failed: {0}")]
    Decode(String),

    #[error("request cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
