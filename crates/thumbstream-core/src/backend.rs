//! The fetch backend seam.
//!
//! The cache never loads images itself. It hands requests to a
//! [`FetchBackend`], drains results once per frame with
//! [`FetchBackend::poll`], and returns images it no longer needs
//! through [`FetchBackend::release`].

use thumbstream_types::{FetchError, PixelImage};

use crate::key::{ThumbnailKind, Ticket};
use crate::playlist::Content;

/// Anything the cache can store as a thumbnail.
pub trait ImageSize {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
}

impl ImageSize for PixelImage {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

/// One load request.
#[derive(Debug, Clone, Copy)]
pub struct ThumbnailRequest<'a> {
    pub ticket: Ticket,
    pub kind: ThumbnailKind,
    pub content: &'a Content,
}

/// A finished request, delivered through [`FetchBackend::poll`].
#[derive(Debug)]
pub struct Completion<I> {
    pub ticket: Ticket,
    pub result: Result<I, FetchError>,
}

impl<I> Completion<I> {
    pub fn available(ticket: Ticket, image: I) -> Self {
        Self {
            ticket,
            result: Ok(image),
        }
    }

    pub fn missing(ticket: Ticket, err: FetchError) -> Self {
        Self {
            ticket,
            result: Err(err),
        }
    }
}

/// Image source driven by the cache on the UI thread.
pub trait FetchBackend {
    type Image: ImageSize;

    /// Start loading. An `Err` means the request was rejected outright;
    /// the slot becomes `Missing` and no completion is expected.
    fn request(&mut self, request: ThumbnailRequest<'_>) -> Result<(), FetchError>;

    /// Abandon an outstanding request. Cancelling an unknown or already
    /// completed ticket does nothing.
    fn cancel(&mut self, ticket: Ticket);

    /// Append finished requests to `out`.
    fn poll(&mut self, out: &mut Vec<Completion<Self::Image>>);

    /// Take back an image the cache has dropped (texture unload).
    fn release(&mut self, image: Self::Image) {
        drop(image);
    }
}
