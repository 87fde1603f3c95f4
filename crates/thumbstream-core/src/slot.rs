//! Per-entry, per-kind thumbnail state machine.
//!
//! `Unknown -> Pending -> Available | Missing`, and any state back to
//! `Unknown` through [`ThumbnailSlot::reset`]. The slot owns its image
//! while `Available`; reset hands it back to the caller for release.

/// Observable status of a thumbnail slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThumbnailStatus {
    /// Nothing requested yet (or evicted).
    Unknown,
    /// A request is in flight.
    Pending,
    /// Image loaded and owned by the slot.
    Available,
    /// No image exists; the presentation layer draws a placeholder.
    Missing,
}

impl ThumbnailStatus {
    /// `Available` or `Missing`.
    pub fn is_resolved(self) -> bool {
        matches!(self, Self::Available | Self::Missing)
    }
}

#[derive(Debug)]
enum SlotState<I> {
    Unknown { dwell_ms: f32 },
    Pending,
    Available(I),
    Missing,
}

/// Whether a fade animation is tagged to this slot's alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FadeState {
    #[default]
    Idle,
    Active,
}

/// Outcome of handing a completion to a slot.
#[derive(Debug)]
pub(crate) enum Applied<I> {
    /// The slot moved to this status.
    Stored(ThumbnailStatus),
    /// The completion no longer matches the slot; any image comes back
    /// to the caller for release.
    Stale(Option<I>),
}

/// What a reset tore down. The caller cancels, releases, and kills
/// the fade based on these fields.
#[derive(Debug)]
pub(crate) struct Teardown<I> {
    pub previous: ThumbnailStatus,
    pub generation: u64,
    pub image: Option<I>,
    pub was_fading: bool,
}

/// One thumbnail's cache state.
#[derive(Debug)]
pub struct ThumbnailSlot<I> {
    state: SlotState<I>,
    alpha: f32,
    fade: FadeState,
    generation: u64,
}

impl<I> Default for ThumbnailSlot<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> ThumbnailSlot<I> {
    pub fn new() -> Self {
        Self {
            state: SlotState::Unknown { dwell_ms: 0.0 },
            alpha: 0.0,
            fade: FadeState::Idle,
            generation: 0,
        }
    }

    pub fn status(&self) -> ThumbnailStatus {
        match self.state {
            SlotState::Unknown { .. } => ThumbnailStatus::Unknown,
            SlotState::Pending => ThumbnailStatus::Pending,
            SlotState::Available(_) => ThumbnailStatus::Available,
            SlotState::Missing => ThumbnailStatus::Missing,
        }
    }

    /// Presentation alpha in `[0, 1]`.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn image(&self) -> Option<&I> {
        match &self.state {
            SlotState::Available(image) => Some(image),
            _ => None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn fade(&self) -> FadeState {
        self.fade
    }

    pub fn is_fading(&self) -> bool {
        self.fade == FadeState::Active
    }

    /// Accumulated on-screen time while `Unknown`; zero otherwise.
    pub fn dwell_ms(&self) -> f32 {
        match self.state {
            SlotState::Unknown { dwell_ms } => dwell_ms,
            _ => 0.0,
        }
    }

    /// Add `dt_ms` to the dwell timer and return the new total.
    /// Returns `None` if the slot is not `Unknown`.
    pub(crate) fn accumulate_dwell(&mut self, dt_ms: f32) -> Option<f32> {
        match &mut self.state {
            SlotState::Unknown { dwell_ms } => {
                *dwell_ms += dt_ms;
                Some(*dwell_ms)
            }
            _ => None,
        }
    }

    /// `Unknown -> Pending`. Returns the generation the request must
    /// carry.
    pub(crate) fn begin_request(&mut self) -> u64 {
        debug_assert_eq!(self.status(), ThumbnailStatus::Unknown);
        self.state = SlotState::Pending;
        self.generation
    }

    /// Apply a completion issued at `generation`. Only a `Pending` slot
    /// at the same generation accepts it.
    pub(crate) fn complete(&mut self, generation: u64, image: Option<I>) -> Applied<I> {
        if generation != self.generation || !matches!(self.state, SlotState::Pending) {
            return Applied::Stale(image);
        }
        self.state = match image {
            Some(image) => SlotState::Available(image),
            None => SlotState::Missing,
        };
        Applied::Stored(self.status())
    }

    /// `Unknown | Pending -> Missing` without a completion.
    pub(crate) fn mark_missing(&mut self) {
        debug_assert!(self.image().is_none());
        self.state = SlotState::Missing;
    }

    pub(crate) fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    pub(crate) fn set_fade(&mut self, fade: FadeState) {
        self.fade = fade;
    }

    /// Return to `Unknown`, zeroing alpha and dwell. The generation is
    /// bumped so any outstanding completion becomes stale. Resetting an
    /// idle `Unknown` slot changes nothing.
    pub(crate) fn reset(&mut self) -> Teardown<I> {
        let previous = self.status();
        let generation = self.generation;
        let was_fading = self.is_fading();
        let old = std::mem::replace(&mut self.state, SlotState::Unknown { dwell_ms: 0.0 });
        let image = match old {
            SlotState::Available(image) => Some(image),
            _ => None,
        };
        if previous != ThumbnailStatus::Unknown {
            self.generation = self.generation.wrapping_add(1);
        }
        self.alpha = 0.0;
        self.fade = FadeState::Idle;
        Teardown {
            previous,
            generation,
            image,
            was_fading,
        }
    }
}
