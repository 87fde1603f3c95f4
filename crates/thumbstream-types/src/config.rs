//! Stream configuration loaded from `thumbstream.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ThumbError};

/// Time (ms) an entry must stay on screen before its thumbnail is
/// requested during normal navigation (one frame at 60 Hz).
pub const DEFAULT_STREAM_DELAY_MS: f32 = 16.666_67;
/// Dwell time while the scrollbar is being dragged.
pub const DEFAULT_SCROLLBAR_DELAY_MS: f32 = DEFAULT_STREAM_DELAY_MS * 5.0;
/// Dwell time for the desktop sidebar; matches the list scroll-settle
/// animation.
pub const DEFAULT_SIDEBAR_DELAY_MS: f32 = 166.666_67;
/// Duration of the thumbnail fade-in.
pub const DEFAULT_FADE_DURATION_MS: f32 = 166.666_67;

/// Thumbnail image category, mapped to a `Named_*` directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThumbnailType {
    Snaps,
    Titles,
    Boxarts,
    Logos,
}

impl ThumbnailType {
    /// Directory name used inside a system's thumbnail folder.
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Snaps => "Named_Snaps",
            Self::Titles => "Named_Titles",
            Self::Boxarts => "Named_Boxarts",
            Self::Logos => "Named_Logos",
        }
    }
}

/// Tunables for the thumbnail streaming cache.
///
/// Every field is optional in TOML; missing keys take the defaults
/// below. Negative delays or durations fall back to their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Dwell time before requesting during normal navigation.
    pub stream_delay_ms: f32,
    /// Dwell time while dragging the scrollbar.
    pub scrollbar_delay_ms: f32,
    /// Dwell time in the desktop sidebar layout.
    pub sidebar_delay_ms: f32,
    /// Animate alpha 0 -> 1 when a thumbnail arrives.
    pub fade_enabled: bool,
    /// Fade duration. Zero means "appear immediately".
    pub fade_duration_ms: f32,
    /// Also fade in the placeholder for missing thumbnails.
    pub fade_missing: bool,
    /// Root of the `<system>/Named_*/<name>.png` tree.
    pub thumbnail_dir: PathBuf,
    /// Image category for the primary slot.
    pub primary_type: ThumbnailType,
    /// Load secondary thumbnails at all. View modes that force the
    /// secondary slot on still show a placeholder when this is off.
    pub secondary_enabled: bool,
    /// Image category for the secondary slot.
    pub secondary_type: ThumbnailType,
    /// Show the secondary thumbnail in the large list view.
    pub list_secondary: bool,
    /// Try `.jpg`/`.jpeg`/`.bmp`/`.tga` after `.png`.
    pub allow_non_png: bool,
    /// Worker threads used by the filesystem backend.
    pub worker_threads: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            stream_delay_ms: DEFAULT_STREAM_DELAY_MS,
            scrollbar_delay_ms: DEFAULT_SCROLLBAR_DELAY_MS,
            sidebar_delay_ms: DEFAULT_SIDEBAR_DELAY_MS,
            fade_enabled: true,
            fade_duration_ms: DEFAULT_FADE_DURATION_MS,
            fade_missing: false,
            thumbnail_dir: PathBuf::from("thumbnails"),
            primary_type: ThumbnailType::Boxarts,
            secondary_enabled: true,
            secondary_type: ThumbnailType::Snaps,
            list_secondary: false,
            allow_non_png: false,
            worker_threads: 2,
        }
    }
}

impl StreamConfig {
    /// Parse a config from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let cfg: StreamConfig = toml::from_str(text)
            .map_err(|e| ThumbError::Config(format!("thumbstream.toml: {e}")))?;
        Ok(cfg.normalized())
    }

    /// Load a config file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let cfg = Self::from_toml(&text)?;
        log::debug!("Loaded stream config from {}", path.display());
        Ok(cfg)
    }

    /// Replace out-of-range values with their defaults.
    pub fn normalized(mut self) -> Self {
        fn or_default(value: f32, default: f32) -> f32 {
            if value >= 0.0 && value.is_finite() {
                value
            } else {
                default
            }
        }
        self.stream_delay_ms = or_default(self.stream_delay_ms, DEFAULT_STREAM_DELAY_MS);
        self.scrollbar_delay_ms = or_default(self.scrollbar_delay_ms, DEFAULT_SCROLLBAR_DELAY_MS);
        self.sidebar_delay_ms = or_default(self.sidebar_delay_ms, DEFAULT_SIDEBAR_DELAY_MS);
        self.fade_duration_ms = or_default(self.fade_duration_ms, DEFAULT_FADE_DURATION_MS);
        self.worker_threads = self.worker_threads.max(1);
        self
    }

    /// Whether arriving thumbnails should animate rather than pop in.
    pub fn fades(&self) -> bool {
        self.fade_enabled && self.fade_duration_ms > 0.0
    }
}
