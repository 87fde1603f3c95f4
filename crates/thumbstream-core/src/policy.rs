//! View modes and the streaming policy they select.

use std::fmt;

use thumbstream_types::StreamConfig;

use crate::key::ThumbnailKind;

/// List presentation. Each mode decides which thumbnail slots are
/// streamed and how long an entry must dwell on screen first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewMode {
    /// Text only; no thumbnails.
    TextList,
    ListSmall,
    #[default]
    ListMedium,
    ListLarge,
    /// Two thumbnails side by side per entry.
    DualIcon,
    /// Wide layout with a sidebar showing the selected entry.
    Desktop,
}

impl ViewMode {
    /// Thumbnail draw size class. Switching between modes of different
    /// classes invalidates every loaded image.
    pub fn thumbnail_size(self) -> u8 {
        match self {
            Self::TextList => 0,
            Self::ListSmall => 1,
            Self::ListMedium => 2,
            Self::ListLarge | Self::Desktop => 3,
            Self::DualIcon => 4,
        }
    }

    /// Whether the selection is pinned into the interest set.
    pub fn is_sidebar(self) -> bool {
        self == Self::Desktop
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TextList => "text list",
            Self::ListSmall => "small list",
            Self::ListMedium => "medium list",
            Self::ListLarge => "large list",
            Self::DualIcon => "dual icon",
            Self::Desktop => "desktop",
        };
        f.write_str(name)
    }
}

/// Which coalescing delay is in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayPreset {
    Navigation,
    ScrollbarDrag,
    Sidebar,
}

/// Per-frame streaming rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamPolicy {
    pub preset: DelayPreset,
    /// Dwell time (ms) before an on-screen entry is requested.
    pub request_delay_ms: f32,
    pub allow_primary: bool,
    /// Stream the secondary slot.
    pub allow_secondary: bool,
    /// The secondary slot is always shown, so a disabled secondary
    /// thumbnail must still resolve to `Missing` for its placeholder.
    pub force_secondary: bool,
}

impl StreamPolicy {
    /// Pick the policy for `mode`, given the scrollbar drag state.
    pub fn select(mode: ViewMode, scrollbar_dragging: bool, cfg: &StreamConfig) -> Self {
        let preset = if mode.is_sidebar() {
            DelayPreset::Sidebar
        } else if scrollbar_dragging {
            DelayPreset::ScrollbarDrag
        } else {
            DelayPreset::Navigation
        };
        let request_delay_ms = match preset {
            DelayPreset::Navigation => cfg.stream_delay_ms,
            DelayPreset::ScrollbarDrag => cfg.scrollbar_delay_ms,
            DelayPreset::Sidebar => cfg.sidebar_delay_ms,
        };

        let (allow_primary, allow_secondary, force_secondary) = match mode {
            ViewMode::TextList => (false, false, false),
            ViewMode::ListSmall | ViewMode::ListMedium => (true, false, false),
            ViewMode::ListLarge => (true, cfg.list_secondary && cfg.secondary_enabled, false),
            ViewMode::DualIcon | ViewMode::Desktop => (true, true, true),
        };

        Self {
            preset,
            request_delay_ms,
            allow_primary,
            allow_secondary,
            force_secondary,
        }
    }

    /// Whether `kind` slots are processed at all under this policy.
    pub fn processes(&self, kind: ThumbnailKind) -> bool {
        match kind {
            ThumbnailKind::Primary => self.allow_primary,
            ThumbnailKind::Secondary => self.allow_secondary,
        }
    }

    /// A processed slot that must resolve straight to `Missing` without
    /// a request.
    pub fn placeholder_only(&self, kind: ThumbnailKind, cfg: &StreamConfig) -> bool {
        kind == ThumbnailKind::Secondary && self.force_secondary && !cfg.secondary_enabled
    }

    pub fn streams_anything(&self) -> bool {
        self.allow_primary || self.allow_secondary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_delay_by_default() {
        let cfg = StreamConfig::default();
        let p = StreamPolicy::select(ViewMode::ListMedium, false, &cfg);
        assert_eq!(p.preset, DelayPreset::Navigation);
        assert_eq!(p.request_delay_ms, cfg.stream_delay_ms);
        assert!(p.processes(ThumbnailKind::Primary));
        assert!(!p.processes(ThumbnailKind::Secondary));
    }

    #[test]
    fn scrollbar_drag_uses_longer_delay() {
        let cfg = StreamConfig::default();
        let p = StreamPolicy::select(ViewMode::ListSmall, true, &cfg);
        assert_eq!(p.preset, DelayPreset::ScrollbarDrag);
        assert_eq!(p.request_delay_ms, cfg.scrollbar_delay_ms);
    }

    #[test]
    fn desktop_always_uses_sidebar_delay() {
        let cfg = StreamConfig::default();
        for dragging in [false, true] {
            let p = StreamPolicy::select(ViewMode::Desktop, dragging, &cfg);
            assert_eq!(p.preset, DelayPreset::Sidebar);
            assert_eq!(p.request_delay_ms, cfg.sidebar_delay_ms);
        }
    }

    #[test]
    fn text_list_streams_nothing() {
        let p = StreamPolicy::select(ViewMode::TextList, false, &StreamConfig::default());
        assert!(!p.streams_anything());
    }

    #[test]
    fn large_list_secondary_follows_config() {
        let mut cfg = StreamConfig::default();
        let p = StreamPolicy::select(ViewMode::ListLarge, false, &cfg);
        assert!(!p.allow_secondary);
        cfg.list_secondary = true;
        let p = StreamPolicy::select(ViewMode::ListLarge, false, &cfg);
        assert!(p.allow_secondary);
        assert!(!p.force_secondary);
    }

    #[test]
    fn large_list_secondary_off_when_secondary_disabled() {
        let cfg = StreamConfig {
            list_secondary: true,
            secondary_enabled: false,
            ..StreamConfig::default()
        };
        let p = StreamPolicy::select(ViewMode::ListLarge, false, &cfg);
        assert!(!p.processes(ThumbnailKind::Secondary));
        assert!(p.processes(ThumbnailKind::Primary));
    }

    #[test]
    fn dual_modes_force_secondary() {
        let mut cfg = StreamConfig::default();
        let p = StreamPolicy::select(ViewMode::DualIcon, false, &cfg);
        assert!(p.force_secondary);
        assert!(!p.placeholder_only(ThumbnailKind::Secondary, &cfg));

        cfg.secondary_enabled = false;
        assert!(p.placeholder_only(ThumbnailKind::Secondary, &cfg));
        assert!(!p.placeholder_only(ThumbnailKind::Primary, &cfg));
    }

    #[test]
    fn size_classes() {
        assert_eq!(ViewMode::ListLarge.thumbnail_size(), ViewMode::Desktop.thumbnail_size());
        assert_ne!(ViewMode::ListSmall.thumbnail_size(), ViewMode::ListMedium.thumbnail_size());
    }
}
