//! In-memory backend for hosts without a thumbnail tree, benchmarks,
//! and tests.

use std::collections::HashMap;

use thumbstream_types::{FetchError, PixelImage};

use crate::backend::{Completion, FetchBackend, ThumbnailRequest};
use crate::key::{ThumbnailKind, Ticket};

struct PendingLoad {
    ticket: Ticket,
    frames_left: u32,
    result: Result<PixelImage, FetchError>,
}

/// Serves images registered by display label.
///
/// A request completes on the poll `latency_frames` polls after the
/// next one; with the default latency of zero it completes on the next
/// poll. Labels with no registered image complete as `NotFound`.
#[derive(Default)]
pub struct MemoryBackend {
    images: HashMap<String, HashMap<ThumbnailKind, PixelImage>>,
    latency_frames: u32,
    pending: Vec<PendingLoad>,
    requests: u64,
    released: u64,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(mut self, frames: u32) -> Self {
        self.latency_frames = frames;
        self
    }

    pub fn insert(&mut self, label: impl Into<String>, kind: ThumbnailKind, image: PixelImage) {
        self.images.entry(label.into()).or_default().insert(kind, image);
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn requests(&self) -> u64 {
        self.requests
    }

    pub fn released(&self) -> u64 {
        self.released
    }
}

impl FetchBackend for MemoryBackend {
    type Image = PixelImage;

    fn request(&mut self, request: ThumbnailRequest<'_>) -> Result<(), FetchError> {
        self.requests += 1;
        let result = self
            .images
            .get(request.content.display_label())
            .and_then(|by_kind| by_kind.get(&request.kind))
            .cloned()
            .ok_or(FetchError::NotFound);
        self.pending.push(PendingLoad {
            ticket: request.ticket,
            frames_left: self.latency_frames,
            result,
        });
        Ok(())
    }

    fn cancel(&mut self, ticket: Ticket) {
        self.pending.retain(|p| p.ticket != ticket);
    }

    fn poll(&mut self, out: &mut Vec<Completion<PixelImage>>) {
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].frames_left == 0 {
                let load = self.pending.swap_remove(i);
                out.push(Completion {
                    ticket: load.ticket,
                    result: load.result,
                });
            } else {
                self.pending[i].frames_left -= 1;
                i += 1;
            }
        }
    }

    fn release(&mut self, image: PixelImage) {
        self.released += 1;
        drop(image);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{EntryId, ThumbnailKey};
    use crate::playlist::Content;

    fn ticket(entry: u64) -> Ticket {
        Ticket {
            key: ThumbnailKey::new(EntryId(entry), ThumbnailKind::Primary),
            generation: 1,
        }
    }

    fn request(backend: &mut MemoryBackend, entry: u64, label: &str) {
        request_content(backend, entry, &Content::new("", label));
    }

    fn request_content(backend: &mut MemoryBackend, entry: u64, content: &Content) {
        backend
            .request(ThumbnailRequest {
                ticket: ticket(entry),
                kind: ThumbnailKind::Primary,
                content,
            })
            .unwrap();
    }

    #[test]
    fn registered_label_completes_on_next_poll() {
        let mut backend = MemoryBackend::new();
        let image = PixelImage::solid(8, 8, [9; 4]);
        backend.insert("Alpha", ThumbnailKind::Primary, image.clone());
        request(&mut backend, 0, "Alpha");

        let mut out = Vec::new();
        backend.poll(&mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].result.as_ref().unwrap(), &image);
        assert_eq!(backend.pending(), 0);
    }

    #[test]
    fn unknown_label_is_not_found() {
        let mut backend = MemoryBackend::new();
        request(&mut backend, 0, "Nobody");
        let mut out = Vec::new();
        backend.poll(&mut out);
        assert!(matches!(out[0].result, Err(FetchError::NotFound)));
    }

    #[test]
    fn unlabelled_content_uses_file_name() {
        let mut backend = MemoryBackend::new();
        backend.insert("tetris.gb", ThumbnailKind::Primary, PixelImage::solid(2, 2, [3; 4]));
        request_content(&mut backend, 0, &Content::new("/roms/tetris.gb", ""));
        let mut out = Vec::new();
        backend.poll(&mut out);
        assert!(out[0].result.is_ok());
    }

    #[test]
    fn kinds_are_registered_separately() {
        let mut backend = MemoryBackend::new();
        backend.insert("Alpha", ThumbnailKind::Secondary, PixelImage::solid(1, 1, [0; 4]));
        request(&mut backend, 0, "Alpha");
        let mut out = Vec::new();
        backend.poll(&mut out);
        assert!(out[0].result.is_err());
    }

    #[test]
    fn latency_delays_completion() {
        let mut backend = MemoryBackend::new().with_latency(2);
        request(&mut backend, 0, "Alpha");
        let mut out = Vec::new();
        backend.poll(&mut out);
        backend.poll(&mut out);
        assert!(out.is_empty());
        backend.poll(&mut out);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn cancel_drops_pending_load() {
        let mut backend = MemoryBackend::new().with_latency(1);
        request(&mut backend, 0, "Alpha");
        request(&mut backend, 1, "Beta");
        backend.cancel(ticket(0));
        backend.cancel(ticket(0));
        let mut out = Vec::new();
        backend.poll(&mut out);
        backend.poll(&mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].ticket, ticket(1));
        assert_eq!(backend.requests(), 2);
    }

    #[test]
    fn release_is_counted() {
        let mut backend = MemoryBackend::new();
        backend.release(PixelImage::solid(1, 1, [0; 4]));
        assert_eq!(backend.released(), 1);
    }
}
