//! thumbstream-core: viewport-driven thumbnail streaming.
//!
//! A [`ThumbnailCache`] keeps two thumbnail slots per list entry and,
//! once per frame, decides which slots to load and which to drop based
//! on what is on screen. Loads go through a [`FetchBackend`]; results
//! are applied only if the slot has not been reset since the request
//! was issued. Newly arrived thumbnails fade in through a
//! [`thumbstream_ui::FadeAnimator`].
//!
//! ```text
//! host ── on_frame(dt, layout, viewport) ──> ThumbnailCache
//!                                              │ StreamScheduler
//!                                              │   fades > completions > evict > request > pin
//!                                              v
//!                                          FetchBackend (FsBackend / MemoryBackend / host)
//! ```

pub mod backend;
pub mod cache;
pub mod interest;
pub mod key;
pub mod loader;
pub mod path;
pub mod playlist;
pub mod policy;
pub mod registry;
pub mod scheduler;
pub mod slot;

#[cfg(test)]
pub(crate) mod test_utils;

pub use backend::{Completion, FetchBackend, ImageSize, ThumbnailRequest};
pub use cache::{FrameInput, ThumbnailCache};
pub use interest::InterestSet;
pub use key::{EntryId, ThumbnailKey, ThumbnailKind, Ticket};
pub use loader::{FsBackend, MemoryBackend};
pub use path::PathResolver;
pub use playlist::{Content, Playlist};
pub use policy::{DelayPreset, StreamPolicy, ViewMode};
pub use registry::{Entry, EntryRegistry};
pub use scheduler::CacheStats;
pub use slot::{FadeState, ThumbnailSlot, ThumbnailStatus};
