//! Scripted browsing session: scrolls a list through the cache the way
//! a user would and logs what the cache does.

use std::time::Duration;

use thumbstream_core::{CacheStats, FetchBackend, FrameInput, ThumbnailCache, ThumbnailKind, ViewMode};
use thumbstream_ui::{Alignment, RowLayout, ScrollState, ViewportGeometry, align_in_box};

/// 60 Hz.
const FRAME_MS: f32 = 1000.0 / 60.0;
/// Sidebar thumbnail box, right of a 640px list.
const SIDEBAR_BOX: (f32, f32, u32, u32) = (640.0, 16.0, 320, 240);

pub struct Session<B: FetchBackend> {
    cache: ThumbnailCache<B>,
    scroll: ScrollState,
    layout: RowLayout,
    viewport_height: f32,
    /// Sleep for a frame between passes so threaded loads can land.
    realtime: bool,
    frames: u64,
    last_stats: CacheStats,
    last_sidebar: Option<usize>,
}

impl<B: FetchBackend> Session<B> {
    pub fn new(cache: ThumbnailCache<B>, row_height: f32, viewport_height: f32, realtime: bool) -> Self {
        let layout = RowLayout::uniform(0.0, row_height, cache.len());
        let mut scroll = ScrollState::new(viewport_height);
        scroll.set_content_height(layout.content_height());
        Self {
            cache,
            scroll,
            layout,
            viewport_height,
            realtime,
            frames: 0,
            last_stats: CacheStats::default(),
            last_sidebar: None,
        }
    }

    fn frame(&mut self) {
        self.scroll.tick();
        self.cache
            .set_scrollbar_dragging(self.scroll.is_dragging_scrollbar());
        self.cache.on_frame(&FrameInput {
            dt_ms: FRAME_MS,
            layout: &self.layout,
            viewport: ViewportGeometry::new(self.scroll.scroll_y, 0.0, self.viewport_height),
        });
        self.frames += 1;

        let stats = self.cache.stats();
        if stats != self.last_stats {
            log::debug!(
                "frame {}: +{} requested, +{} loaded, +{} missing, +{} evicted",
                self.frames,
                stats.requests - self.last_stats.requests,
                stats.available - self.last_stats.available,
                stats.missing - self.last_stats.missing,
                stats.evictions - self.last_stats.evictions,
            );
            self.last_stats = stats;
        }
        let sidebar = self.cache.sidebar_index();
        if self.cache.view_mode().is_sidebar() && sidebar != self.last_sidebar {
            if let Some(index) = sidebar {
                let (x, y, box_w, box_h) = SIDEBAR_BOX;
                let (w, h) =
                    self.cache
                        .draw_dimensions(index, ThumbnailKind::Primary, box_w, box_h, 1.0);
                let (dx, dy) =
                    align_in_box(x, y, box_w as f32, box_h as f32, w, h, Alignment::Top);
                log::info!(
                    "Sidebar shows #{index} ({:?}) at ({dx:.0}, {dy:.0}) {w:.0}x{h:.0}",
                    self.cache.status(index, ThumbnailKind::Primary)
                );
            }
            self.last_sidebar = sidebar;
        }

        if self.realtime {
            std::thread::sleep(Duration::from_secs_f32(FRAME_MS / 1000.0));
        }
    }

    /// Hold still for `frames` frames.
    pub fn settle(&mut self, frames: u32) {
        for _ in 0..frames {
            self.frame();
        }
    }

    /// Flick the list and run until it coasts to a stop.
    pub fn fling(&mut self, velocity: f32) {
        log::info!("Fling at {velocity} px/frame from y={:.0}", self.scroll.scroll_y);
        self.scroll.fling(velocity);
        while self.scroll.tick() {
            self.frame();
        }
        self.frame();
    }

    /// Drag the scrollbar thumb to `fraction` over `frames` frames.
    pub fn drag_to(&mut self, fraction: f32, frames: u32) {
        log::info!("Scrollbar drag to {:.0}%", fraction * 100.0);
        let start = self.scroll.scroll_fraction();
        self.scroll.begin_scrollbar_drag();
        for step in 1..=frames.max(1) {
            let t = step as f32 / frames.max(1) as f32;
            self.scroll.drag_scrollbar_to(start + (fraction - start) * t);
            self.frame();
        }
        self.scroll.end_scrollbar_drag();
    }

    /// The list was rebuilt in place: back to the top, stream again.
    pub fn repopulate(&mut self) {
        log::info!("List repopulated");
        self.cache.on_list_repopulated();
        self.scroll.reset();
        self.scroll.set_content_height(self.layout.content_height());
    }

    /// Switch to the sidebar layout and step the selection through
    /// `picks`, dwelling `frames` frames on each.
    pub fn browse_sidebar(&mut self, picks: &[usize], frames: u32) {
        self.cache.on_view_mode_changed(ViewMode::Desktop);
        for &index in picks {
            if index >= self.cache.len() {
                continue;
            }
            self.cache.set_selection(Some(index));
            if let Some(row) = self.layout.row(index) {
                self.scroll.scroll_to_visible(row.y, row.height);
            }
            self.settle(frames);
        }
    }

    pub fn report(&self) {
        let stats = self.cache.stats();
        log::info!(
            "{} frames: {} requests ({} rejected), {} loaded, {} missing, {} stale, {} evicted, {} entries resident",
            self.frames,
            stats.requests,
            stats.rejected,
            stats.available,
            stats.missing,
            stats.stale,
            stats.evictions,
            self.cache.tracked_entries(),
        );
    }
}
