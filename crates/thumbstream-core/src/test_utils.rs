//! Shared test utilities for thumbstream-core tests.
//!
//! Provides a [`RecordingBackend`] that records every request, cancel,
//! and release for assertion, and a [`RecordingAnimator`] that counts
//! fade starts while delegating to the real tween animator.

use std::collections::{HashMap, HashSet};

use thumbstream_types::FetchError;
use thumbstream_ui::{AnimTag, FadeAnimator, TweenAnimator};

use crate::backend::{Completion, FetchBackend, ImageSize, ThumbnailRequest};
use crate::key::{ThumbnailKey, Ticket};
use crate::playlist::Content;

/// `n` valid entries labelled `Game 0`, `Game 1`, ...
pub fn contents(n: usize) -> Vec<Content> {
    (0..n)
        .map(|i| Content::new(format!("/roms/game{i}.zip"), format!("Game {i}")))
        .collect()
}

/// Stand-in for a decoded texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestImage {
    pub width: u32,
    pub height: u32,
    pub serial: u64,
}

impl ImageSize for TestImage {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

/// A backend that completes only when told to.
///
/// Panics if the cache requests a key that already has a request
/// outstanding.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub requests: Vec<Ticket>,
    pub cancels: Vec<Ticket>,
    pub released: Vec<TestImage>,
    /// Labels whose requests are rejected synchronously.
    pub reject_labels: HashSet<String>,
    /// Generation of the outstanding request per key.
    outstanding: HashMap<ThumbnailKey, u64>,
    queued: Vec<Completion<TestImage>>,
    next_serial: u64,
}

impl RecordingBackend {
    /// Queue a successful result for delivery on the next poll.
    pub fn complete_ok(&mut self, ticket: Ticket, width: u32, height: u32) {
        self.next_serial += 1;
        let image = TestImage {
            width,
            height,
            serial: self.next_serial,
        };
        self.queued.push(Completion::available(ticket, image));
    }

    /// Queue a not-found result for delivery on the next poll.
    pub fn complete_missing(&mut self, ticket: Ticket) {
        self.queued
            .push(Completion::missing(ticket, FetchError::NotFound));
    }

    /// Complete every outstanding request successfully.
    pub fn complete_all_ok(&mut self) {
        let tickets: Vec<Ticket> = self
            .requests
            .iter()
            .copied()
            .filter(|t| self.outstanding.get(&t.key) == Some(&t.generation))
            .filter(|t| !self.queued.iter().any(|c| c.ticket == *t))
            .collect();
        for ticket in tickets {
            self.complete_ok(ticket, 64, 48);
        }
    }

    /// Most recent request for `key`.
    pub fn last_request(&self, key: ThumbnailKey) -> Option<Ticket> {
        self.requests.iter().rev().copied().find(|t| t.key == key)
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding.len()
    }

    pub fn is_outstanding(&self, key: ThumbnailKey) -> bool {
        self.outstanding.contains_key(&key)
    }

    fn settle(&mut self, ticket: Ticket) {
        if self.outstanding.get(&ticket.key) == Some(&ticket.generation) {
            self.outstanding.remove(&ticket.key);
        }
    }
}

impl FetchBackend for RecordingBackend {
    type Image = TestImage;

    fn request(&mut self, request: ThumbnailRequest<'_>) -> Result<(), FetchError> {
        let key = request.ticket.key;
        if self.reject_labels.contains(&request.content.label) {
            return Err(FetchError::NotFound);
        }
        let previous = self.outstanding.insert(key, request.ticket.generation);
        assert!(
            previous.is_none(),
            "duplicate request for {key} while one is outstanding"
        );
        self.requests.push(request.ticket);
        Ok(())
    }

    fn cancel(&mut self, ticket: Ticket) {
        self.settle(ticket);
        self.cancels.push(ticket);
    }

    fn poll(&mut self, out: &mut Vec<Completion<TestImage>>) {
        let tickets: Vec<Ticket> = self.queued.iter().map(|c| c.ticket).collect();
        for ticket in tickets {
            self.settle(ticket);
        }
        out.append(&mut self.queued);
    }

    fn release(&mut self, image: TestImage) {
        assert!(
            !self.released.iter().any(|r| r.serial == image.serial),
            "image {} released twice",
            image.serial
        );
        self.released.push(image);
    }
}

/// Wraps [`TweenAnimator`] and records every call.
#[derive(Debug, Default)]
pub struct RecordingAnimator {
    inner: TweenAnimator,
    pub started: Vec<AnimTag>,
    pub killed: Vec<AnimTag>,
}

impl RecordingAnimator {
    /// Fades started for `tag`.
    pub fn starts_for(&self, tag: AnimTag) -> usize {
        self.started.iter().filter(|&&t| t == tag).count()
    }

    pub fn running(&self) -> usize {
        self.inner.len()
    }
}

impl FadeAnimator for RecordingAnimator {
    fn animate(&mut self, tag: AnimTag, from: f32, target: f32, duration_ms: f32) {
        self.started.push(tag);
        self.inner.animate(tag, from, target, duration_ms);
    }

    fn kill(&mut self, tag: AnimTag) -> bool {
        self.killed.push(tag);
        self.inner.kill(tag)
    }

    fn is_active(&self, tag: AnimTag) -> bool {
        self.inner.is_active(tag)
    }

    fn advance(&mut self, dt_ms: f32, apply: &mut dyn FnMut(AnimTag, f32, bool)) {
        self.inner.advance(dt_ms, apply);
    }

    fn clear(&mut self) {
        self.inner.clear();
    }
}
