//! Per-frame streaming pass.
//!
//! One pass runs in a fixed order:
//! 1. advance fades by the frame delta
//! 2. drain backend completions, dropping stale ones
//! 3. evict tracked entries that left the interest set
//! 4. accumulate dwell and issue requests for the interest set
//! 5. move the sidebar pin once the selection has resolved

use std::collections::HashSet;

use thumbstream_types::StreamConfig;
use thumbstream_ui::{AnimTag, FadeAnimator};

use crate::backend::{Completion, FetchBackend, ThumbnailRequest};
use crate::interest::InterestSet;
use crate::key::{EntryId, ThumbnailKey, ThumbnailKind, Ticket};
use crate::policy::{DelayPreset, StreamPolicy};
use crate::registry::{Entry, EntryRegistry};
use crate::slot::{Applied, FadeState, ThumbnailSlot, ThumbnailStatus};

/// Counters since the cache was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Requests accepted by the backend.
    pub requests: u64,
    /// Requests the backend rejected outright.
    pub rejected: u64,
    /// Slots that became `Available`.
    pub available: u64,
    /// Slots that became `Missing`, for any reason.
    pub missing: u64,
    /// Completions dropped because their slot had moved on.
    pub stale: u64,
    /// Non-idle slots reset by eviction or a lifecycle call.
    pub evictions: u64,
}

/// Everything a pass touches besides the scheduler's own state.
pub(crate) struct Frame<'a, B: FetchBackend, A> {
    pub registry: &'a mut EntryRegistry<B::Image>,
    pub backend: &'a mut B,
    pub animator: &'a mut A,
    pub cfg: &'a StreamConfig,
    pub policy: StreamPolicy,
}

/// Cross-frame streaming state.
#[derive(Debug)]
pub(crate) struct StreamScheduler<I> {
    /// Entries with at least one slot that is not idle `Unknown`.
    tracked: HashSet<EntryId>,
    /// Last sidebar selection whose thumbnails had all resolved.
    last_valid: Option<EntryId>,
    inbox: Vec<Completion<I>>,
    stats: CacheStats,
}

impl<I> Default for StreamScheduler<I> {
    fn default() -> Self {
        Self {
            tracked: HashSet::new(),
            last_valid: None,
            inbox: Vec::new(),
            stats: CacheStats::default(),
        }
    }
}

/// Start the fade-in for a slot that just resolved, if it gets one.
fn init_fade<I, A: FadeAnimator>(
    animator: &mut A,
    cfg: &StreamConfig,
    key: ThumbnailKey,
    slot: &mut ThumbnailSlot<I>,
) {
    let fades_in = match slot.status() {
        ThumbnailStatus::Available => true,
        ThumbnailStatus::Missing => cfg.fade_missing,
        _ => false,
    };
    if !fades_in {
        return;
    }
    if cfg.fades() {
        let tag = key.anim_tag();
        animator.kill(tag);
        slot.set_alpha(0.0);
        slot.set_fade(FadeState::Active);
        animator.animate(tag, 0.0, 1.0, cfg.fade_duration_ms);
    } else {
        slot.set_alpha(1.0);
    }
}

/// Reset one slot and undo everything it holds: in-flight request,
/// image, and fade. Returns whether the slot was doing anything.
fn teardown_slot<B: FetchBackend, A: FadeAnimator>(
    backend: &mut B,
    animator: &mut A,
    key: ThumbnailKey,
    slot: &mut ThumbnailSlot<B::Image>,
) -> bool {
    let teardown = slot.reset();
    if teardown.previous == ThumbnailStatus::Pending {
        backend.cancel(Ticket {
            key,
            generation: teardown.generation,
        });
    }
    if let Some(image) = teardown.image {
        backend.release(image);
    }
    if teardown.was_fading {
        animator.kill(key.anim_tag());
    }
    teardown.previous != ThumbnailStatus::Unknown
}

fn is_idle<I>(entry: &Entry<I>) -> bool {
    ThumbnailKind::ALL.iter().all(|&kind| {
        let slot = entry.slot(kind);
        slot.status() == ThumbnailStatus::Unknown && slot.dwell_ms() == 0.0
    })
}

impl<I> StreamScheduler<I> {
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn last_valid(&self) -> Option<EntryId> {
        self.last_valid
    }

    /// Forget the sidebar pin without touching any slot.
    pub fn clear_pin(&mut self) {
        self.last_valid = None;
    }

    pub fn tracked_len(&self) -> usize {
        self.tracked.len()
    }

    /// Run one frame.
    pub fn run<B, A>(
        &mut self,
        ctx: &mut Frame<'_, B, A>,
        interest: &InterestSet,
        selection: Option<usize>,
        dt_ms: f32,
    ) where
        B: FetchBackend<Image = I>,
        A: FadeAnimator,
    {
        self.advance_fades(ctx, dt_ms);
        self.apply_completions(ctx);
        self.evict(ctx, interest);
        self.request(ctx, interest, dt_ms);
        if ctx.policy.preset == DelayPreset::Sidebar {
            self.update_pin(ctx, selection);
        }
    }

    fn advance_fades<B, A>(&mut self, ctx: &mut Frame<'_, B, A>, dt_ms: f32)
    where
        B: FetchBackend<Image = I>,
        A: FadeAnimator,
    {
        let registry = &mut *ctx.registry;
        ctx.animator.advance(dt_ms, &mut |tag: AnimTag, value: f32, finished: bool| {
            let key = ThumbnailKey::from_anim_tag(tag);
            if let Some(entry) = registry.by_id_mut(key.entry) {
                let slot = entry.slot_mut(key.kind);
                slot.set_alpha(value);
                if finished {
                    slot.set_fade(FadeState::Idle);
                }
            }
        });
    }

    fn apply_completions<B, A>(&mut self, ctx: &mut Frame<'_, B, A>)
    where
        B: FetchBackend<Image = I>,
        A: FadeAnimator,
    {
        let mut inbox = std::mem::take(&mut self.inbox);
        ctx.backend.poll(&mut inbox);
        for completion in inbox.drain(..) {
            self.apply(ctx, completion);
        }
        self.inbox = inbox;
    }

    fn apply<B, A>(&mut self, ctx: &mut Frame<'_, B, A>, completion: Completion<I>)
    where
        B: FetchBackend<Image = I>,
        A: FadeAnimator,
    {
        let Completion { ticket, result } = completion;
        let image = match result {
            Ok(image) => Some(image),
            Err(err) => {
                log::debug!("Thumbnail {ticket} missing: {err}");
                None
            }
        };

        let Some(entry) = ctx.registry.by_id_mut(ticket.key.entry) else {
            log::trace!("Dropping completion {ticket}: entry no longer listed");
            self.stats.stale += 1;
            if let Some(image) = image {
                ctx.backend.release(image);
            }
            return;
        };

        let slot = entry.slot_mut(ticket.key.kind);
        match slot.complete(ticket.generation, image) {
            Applied::Stale(image) => {
                log::trace!("Dropping stale completion {ticket}");
                self.stats.stale += 1;
                if let Some(image) = image {
                    ctx.backend.release(image);
                }
            }
            Applied::Stored(status) => {
                if status == ThumbnailStatus::Available {
                    self.stats.available += 1;
                } else {
                    self.stats.missing += 1;
                }
                init_fade(ctx.animator, ctx.cfg, ticket.key, slot);
            }
        }
    }

    fn evict<B, A>(&mut self, ctx: &mut Frame<'_, B, A>, interest: &InterestSet)
    where
        B: FetchBackend<Image = I>,
        A: FadeAnimator,
    {
        let leaving: Vec<EntryId> = self
            .tracked
            .iter()
            .copied()
            .filter(|&id| {
                ctx.registry
                    .index_of(id)
                    .is_none_or(|index| !interest.contains(index))
            })
            .collect();

        for id in leaving {
            self.tracked.remove(&id);
            let Some(entry) = ctx.registry.by_id_mut(id) else {
                continue;
            };
            for kind in ThumbnailKind::ALL {
                let key = ThumbnailKey::new(id, kind);
                if teardown_slot(ctx.backend, ctx.animator, key, entry.slot_mut(kind)) {
                    log::debug!("Evicted thumbnail {key}");
                    self.stats.evictions += 1;
                }
            }
        }
    }

    fn request<B, A>(&mut self, ctx: &mut Frame<'_, B, A>, interest: &InterestSet, dt_ms: f32)
    where
        B: FetchBackend<Image = I>,
        A: FadeAnimator,
    {
        let policy = ctx.policy;
        if !policy.streams_anything() {
            return;
        }

        for index in interest.indices() {
            let Some(entry) = ctx.registry.get_mut(index) else {
                continue;
            };
            let id = entry.id();

            for kind in ThumbnailKind::ALL {
                if !policy.processes(kind) {
                    continue;
                }
                let (content, slot) = entry.split_mut(kind);
                let Some(dwell) = slot.accumulate_dwell(dt_ms) else {
                    continue;
                };
                self.tracked.insert(id);
                if dwell <= policy.request_delay_ms {
                    continue;
                }

                let key = ThumbnailKey::new(id, kind);
                if !content.is_valid() {
                    slot.mark_missing();
                    slot.set_alpha(1.0);
                    self.stats.missing += 1;
                    continue;
                }
                if policy.placeholder_only(kind, ctx.cfg) {
                    slot.mark_missing();
                    self.stats.missing += 1;
                    init_fade(ctx.animator, ctx.cfg, key, slot);
                    continue;
                }

                let ticket = Ticket {
                    key,
                    generation: slot.begin_request(),
                };
                let request = ThumbnailRequest {
                    ticket,
                    kind,
                    content,
                };
                match ctx.backend.request(request) {
                    Ok(()) => {
                        log::debug!("Requested thumbnail {ticket}");
                        self.stats.requests += 1;
                    }
                    Err(err) => {
                        log::debug!("Thumbnail {ticket} rejected: {err}");
                        slot.mark_missing();
                        self.stats.rejected += 1;
                        self.stats.missing += 1;
                        init_fade(ctx.animator, ctx.cfg, key, slot);
                    }
                }
            }
        }
    }

    fn update_pin<B, A>(&mut self, ctx: &Frame<'_, B, A>, selection: Option<usize>)
    where
        B: FetchBackend<Image = I>,
    {
        let Some(entry) = selection.and_then(|index| ctx.registry.get(index)) else {
            return;
        };
        let resolved = ThumbnailKind::ALL
            .iter()
            .filter(|&&kind| ctx.policy.processes(kind))
            .all(|&kind| entry.slot(kind).status().is_resolved());
        if resolved && self.last_valid != Some(entry.id()) {
            log::debug!("Sidebar pin moved to {}", entry.id());
            self.last_valid = Some(entry.id());
        }
    }

    /// Reset every tracked slot that `filter` selects. Entries left
    /// fully idle stop being tracked.
    pub fn reset_where<B, A>(
        &mut self,
        ctx: &mut Frame<'_, B, A>,
        filter: impl Fn(ThumbnailKind, ThumbnailStatus) -> bool,
    ) where
        B: FetchBackend<Image = I>,
        A: FadeAnimator,
    {
        let ids: Vec<EntryId> = self.tracked.iter().copied().collect();
        for id in ids {
            let Some(entry) = ctx.registry.by_id_mut(id) else {
                self.tracked.remove(&id);
                continue;
            };
            for kind in ThumbnailKind::ALL {
                let slot = entry.slot_mut(kind);
                if !filter(kind, slot.status()) {
                    continue;
                }
                let key = ThumbnailKey::new(id, kind);
                if teardown_slot(ctx.backend, ctx.animator, key, slot) {
                    self.stats.evictions += 1;
                }
            }
            if is_idle(entry) {
                self.tracked.remove(&id);
            }
        }
    }

    /// Reset every tracked slot and forget the sidebar pin.
    pub fn reset_all<B, A>(&mut self, ctx: &mut Frame<'_, B, A>)
    where
        B: FetchBackend<Image = I>,
        A: FadeAnimator,
    {
        self.reset_where(ctx, |_, _| true);
        self.last_valid = None;
    }

    /// Tear down an entry that is leaving the registry.
    pub fn discard_entry<B, A>(&mut self, ctx: &mut Frame<'_, B, A>, entry: &mut Entry<I>)
    where
        B: FetchBackend<Image = I>,
        A: FadeAnimator,
    {
        let id = entry.id();
        self.tracked.remove(&id);
        if self.last_valid == Some(id) {
            self.last_valid = None;
        }
        for kind in ThumbnailKind::ALL {
            let key = ThumbnailKey::new(id, kind);
            if teardown_slot(ctx.backend, ctx.animator, key, entry.slot_mut(kind)) {
                self.stats.evictions += 1;
            }
        }
    }
}
