//! The thumbnail cache facade used by a list view.
//!
//! The host calls [`ThumbnailCache::on_frame`] once per frame with the
//! row layout and viewport, then reads [`ThumbnailCache::status`],
//! [`ThumbnailCache::alpha`] and [`ThumbnailCache::image`] while
//! drawing. Everything runs on the caller's thread.

use thumbstream_types::StreamConfig;
use thumbstream_ui::{FadeAnimator, RowLayout, TweenAnimator, ViewportGeometry, fit_dimensions};

use crate::backend::{FetchBackend, ImageSize};
use crate::interest::InterestSet;
use crate::key::ThumbnailKind;
use crate::playlist::Content;
use crate::policy::{StreamPolicy, ViewMode};
use crate::registry::{Entry, EntryRegistry};
use crate::scheduler::{CacheStats, Frame, StreamScheduler};
use crate::slot::ThumbnailStatus;

/// Per-frame input from the list view.
#[derive(Debug, Clone, Copy)]
pub struct FrameInput<'a> {
    /// Time since the previous frame.
    pub dt_ms: f32,
    pub layout: &'a RowLayout,
    pub viewport: ViewportGeometry,
}

/// Viewport-driven thumbnail cache over a fetch backend `B`.
pub struct ThumbnailCache<B: FetchBackend, A = TweenAnimator> {
    registry: EntryRegistry<B::Image>,
    scheduler: StreamScheduler<B::Image>,
    backend: B,
    animator: A,
    config: StreamConfig,
    mode: ViewMode,
    selection: Option<usize>,
    scrollbar_dragging: bool,
}

impl<B: FetchBackend> ThumbnailCache<B, TweenAnimator> {
    pub fn new(backend: B, config: StreamConfig) -> Self {
        Self::with_animator(backend, TweenAnimator::new(), config)
    }
}

impl<B: FetchBackend, A: FadeAnimator> ThumbnailCache<B, A> {
    pub fn with_animator(backend: B, animator: A, config: StreamConfig) -> Self {
        Self {
            registry: EntryRegistry::new(),
            scheduler: StreamScheduler::default(),
            backend,
            animator,
            config: config.normalized(),
            mode: ViewMode::default(),
            selection: None,
            scrollbar_dragging: false,
        }
    }

    /// Split borrows for one scheduler call.
    fn frame_parts(&mut self) -> (&mut StreamScheduler<B::Image>, Frame<'_, B, A>) {
        let policy = StreamPolicy::select(self.mode, self.scrollbar_dragging, &self.config);
        (
            &mut self.scheduler,
            Frame {
                registry: &mut self.registry,
                backend: &mut self.backend,
                animator: &mut self.animator,
                cfg: &self.config,
                policy,
            },
        )
    }

    // -- Lifecycle --------------------------------------------------------

    /// Replace the list. Every slot of the old list is torn down first.
    pub fn populate(&mut self, contents: Vec<Content>) {
        let (scheduler, mut ctx) = self.frame_parts();
        scheduler.reset_all(&mut ctx);
        let old = ctx.registry.replace(contents);
        for mut entry in old {
            scheduler.discard_entry(&mut ctx, &mut entry);
        }
        self.selection = None;
        log::info!("Thumbnail list populated with {} entries", self.registry.len());
    }

    /// The list was rebuilt in place: reset every slot so thumbnails
    /// stream again. Calling this twice is the same as calling it once.
    pub fn on_list_repopulated(&mut self) {
        let (scheduler, mut ctx) = self.frame_parts();
        scheduler.reset_all(&mut ctx);
        log::debug!("Thumbnail slots reset for repopulated list");
    }

    /// Switch view mode. A different thumbnail size class drops every
    /// loaded image; otherwise only slots the new mode stops showing
    /// are reset. Entering or leaving sidebar mode forgets the pin.
    pub fn on_view_mode_changed(&mut self, mode: ViewMode) {
        if mode == self.mode {
            return;
        }
        let old = std::mem::replace(&mut self.mode, mode);
        log::info!("Thumbnail view mode: {old} -> {mode}");

        let (scheduler, mut ctx) = self.frame_parts();
        if old.thumbnail_size() != mode.thumbnail_size() {
            scheduler.reset_all(&mut ctx);
        } else {
            let policy = ctx.policy;
            scheduler.reset_where(&mut ctx, |kind, _| !policy.processes(kind));
            // Outside sidebar mode the pinned entry is evicted like any other.
            if old.is_sidebar() != mode.is_sidebar() {
                scheduler.clear_pin();
            }
        }
    }

    /// Cancel every in-flight request. `Pending` slots return to
    /// `Unknown` and are requested again once they dwell on screen;
    /// resolved slots keep their image.
    pub fn cancel_all(&mut self) {
        let (scheduler, mut ctx) = self.frame_parts();
        scheduler.reset_where(&mut ctx, |_, status| status == ThumbnailStatus::Pending);
    }

    /// Remove one entry, tearing down its slots. Later entries shift up.
    pub fn remove_entry(&mut self, index: usize) -> Option<Content> {
        let (scheduler, mut ctx) = self.frame_parts();
        let mut entry = ctx.registry.remove(index)?;
        scheduler.discard_entry(&mut ctx, &mut entry);

        let len = self.registry.len();
        self.selection = match self.selection {
            Some(sel) if sel > index => Some(sel - 1),
            Some(sel) if sel >= len => len.checked_sub(1),
            other => other,
        };
        Some(entry.content().clone())
    }

    /// Selected row. Pinned into the interest set in sidebar mode.
    pub fn set_selection(&mut self, index: Option<usize>) {
        self.selection = index.filter(|&i| i < self.registry.len());
    }

    /// While dragging, on-screen entries wait longer before requesting.
    pub fn set_scrollbar_dragging(&mut self, dragging: bool) {
        self.scrollbar_dragging = dragging;
    }

    // -- Per frame --------------------------------------------------------

    /// Run one streaming pass.
    pub fn on_frame(&mut self, input: &FrameInput<'_>) {
        let interest = self.interest(input);
        let selection = self.selection;
        let (scheduler, mut ctx) = self.frame_parts();
        scheduler.run(&mut ctx, &interest, selection, input.dt_ms.max(0.0));
    }

    fn interest(&self, input: &FrameInput<'_>) -> InterestSet {
        let len = self.registry.len();
        let visible = input
            .layout
            .visible_range(&input.viewport)
            .filter(|r| *r.start() < len)
            .map(|r| *r.start()..=(*r.end()).min(len - 1));
        let mut interest = InterestSet::new(visible);
        if self.mode.is_sidebar() {
            if let Some(sel) = self.selection {
                interest.pin(sel);
            }
            if let Some(pinned) = self.pinned_index() {
                interest.pin(pinned);
            }
        }
        interest
    }

    fn pinned_index(&self) -> Option<usize> {
        self.scheduler
            .last_valid()
            .and_then(|id| self.registry.index_of(id))
    }

    // -- Queries ----------------------------------------------------------

    /// Status of a slot; `Unknown` for indices past the end.
    pub fn status(&self, index: usize, kind: ThumbnailKind) -> ThumbnailStatus {
        self.entry(index)
            .map_or(ThumbnailStatus::Unknown, |e| e.slot(kind).status())
    }

    pub fn alpha(&self, index: usize, kind: ThumbnailKind) -> f32 {
        self.entry(index).map_or(0.0, |e| e.slot(kind).alpha())
    }

    pub fn image(&self, index: usize, kind: ThumbnailKind) -> Option<&B::Image> {
        self.entry(index).and_then(|e| e.slot(kind).image())
    }

    pub fn entry(&self, index: usize) -> Option<&Entry<B::Image>> {
        self.registry.get(index)
    }

    /// Row whose thumbnails the sidebar shows. Sticks to the last
    /// selection with resolved thumbnails until the current selection
    /// resolves.
    pub fn sidebar_index(&self) -> Option<usize> {
        if !self.mode.is_sidebar() {
            return self.selection;
        }
        self.pinned_index().or(self.selection)
    }

    /// Aspect-correct size of an `Available` thumbnail fitted into a
    /// `box_w` x `box_h` box, times `scale`. Zero when nothing is loaded.
    pub fn draw_dimensions(
        &self,
        index: usize,
        kind: ThumbnailKind,
        box_w: u32,
        box_h: u32,
        scale: f32,
    ) -> (f32, f32) {
        self.image(index, kind).map_or((0.0, 0.0), |image| {
            fit_dimensions(image.width(), image.height(), box_w, box_h, scale)
        })
    }

    pub fn stats(&self) -> CacheStats {
        self.scheduler.stats()
    }

    /// Entries with at least one non-idle slot.
    pub fn tracked_entries(&self) -> usize {
        self.scheduler.tracked_len()
    }

    pub fn policy(&self) -> StreamPolicy {
        StreamPolicy::select(self.mode, self.scrollbar_dragging, &self.config)
    }

    pub fn view_mode(&self) -> ViewMode {
        self.mode
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn animator(&self) -> &A {
        &self.animator
    }
}

impl<B: FetchBackend, A> Drop for ThumbnailCache<B, A> {
    fn drop(&mut self) {
        // Hand every loaded image back so the backend can unload it.
        for mut entry in self.registry.drain() {
            for kind in ThumbnailKind::ALL {
                let teardown = entry.slot_mut(kind).reset();
                if let Some(image) = teardown.image {
                    self.backend.release(image);
                }
            }
        }
    }
}
