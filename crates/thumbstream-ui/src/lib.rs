//! thumbstream-ui: the presentation-facing half of thumbnail streaming.
//!
//! Fade animation, visible-row tracking, scroll state, and thumbnail
//! placement math. Nothing here draws; the host renderer reads the
//! values these types produce.

pub mod animation;
pub mod layout;
pub mod scroll;
pub mod viewport;

pub use animation::{AnimTag, FadeAnimator, Tween, TweenAnimator};
pub use layout::{Alignment, align_in_box, fit_dimensions};
pub use scroll::ScrollState;
pub use viewport::{RowGeometry, RowLayout, ViewportGeometry};
