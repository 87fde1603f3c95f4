//! Scroll offset management for a playlist view.

/// Friction applied each tick to decelerate smooth scrolling.
const FRICTION: f32 = 0.85;

/// Velocity below this threshold snaps to zero.
const VELOCITY_EPSILON: f32 = 0.5;

/// Maximum smooth-scroll velocity (pixels per tick).
pub const MAX_VELOCITY: f32 = 400.0;

/// Scroll state for a list view.
#[derive(Debug, Clone)]
pub struct ScrollState {
    /// Current vertical scroll offset in pixels.
    pub scroll_y: f32,
    /// Total content height (from layout).
    pub content_height: f32,
    /// Visible viewport height.
    pub viewport_height: f32,
    velocity: f32,
    dragging_scrollbar: bool,
}

impl ScrollState {
    pub fn new(viewport_height: f32) -> Self {
        Self {
            scroll_y: 0.0,
            content_height: 0.0,
            viewport_height,
            velocity: 0.0,
            dragging_scrollbar: false,
        }
    }

    /// Add velocity for smooth scrolling (e.g. a flick or wheel notch).
    pub fn fling(&mut self, velocity: f32) {
        self.velocity = (self.velocity + velocity).clamp(-MAX_VELOCITY, MAX_VELOCITY);
    }

    /// Scroll to an absolute position.
    pub fn scroll_to(&mut self, y: f32) {
        self.velocity = 0.0;
        self.scroll_y = y;
        self.clamp();
    }

    /// Scroll the minimum distance needed to make a row visible.
    pub fn scroll_to_visible(&mut self, row_y: f32, row_height: f32) {
        if row_y < self.scroll_y {
            self.scroll_to(row_y);
        } else if row_y + row_height > self.scroll_y + self.viewport_height {
            self.scroll_to(row_y + row_height - self.viewport_height);
        }
    }

    /// Begin dragging the scrollbar thumb. Stops any fling.
    pub fn begin_scrollbar_drag(&mut self) {
        self.velocity = 0.0;
        self.dragging_scrollbar = true;
    }

    /// Move the scrollbar thumb to `fraction` (0.0 = top, 1.0 = bottom).
    pub fn drag_scrollbar_to(&mut self, fraction: f32) {
        if self.dragging_scrollbar {
            self.scroll_y = fraction.clamp(0.0, 1.0) * self.max_scroll();
        }
    }

    pub fn end_scrollbar_drag(&mut self) {
        self.dragging_scrollbar = false;
    }

    /// Whether the user is dragging the scrollbar. Thumbnail streaming
    /// uses a longer request delay while this is true.
    pub fn is_dragging_scrollbar(&self) -> bool {
        self.dragging_scrollbar
    }

    /// Update content height (after layout).
    pub fn set_content_height(&mut self, height: f32) {
        self.content_height = height;
        self.clamp();
    }

    /// Tick the smooth scroll animation. Returns true if still moving.
    pub fn tick(&mut self) -> bool {
        if self.velocity.abs() < VELOCITY_EPSILON {
            self.velocity = 0.0;
            return false;
        }

        self.scroll_y += self.velocity;
        self.velocity *= FRICTION;
        self.clamp();

        if self.scroll_y <= 0.0 || self.scroll_y >= self.max_scroll() {
            self.velocity = 0.0;
        }

        self.velocity.abs() >= VELOCITY_EPSILON
    }

    /// Get the maximum scroll offset.
    pub fn max_scroll(&self) -> f32 {
        (self.content_height - self.viewport_height).max(0.0)
    }

    fn clamp(&mut self) {
        self.scroll_y = self.scroll_y.clamp(0.0, self.max_scroll());
    }

    /// Scroll position as a fraction for scrollbar rendering.
    pub fn scroll_fraction(&self) -> f32 {
        let max = self.max_scroll();
        if max == 0.0 { 0.0 } else { self.scroll_y / max }
    }

    /// Reset scroll state (for a new list).
    pub fn reset(&mut self) {
        self.scroll_y = 0.0;
        self.velocity = 0.0;
        self.content_height = 0.0;
        self.dragging_scrollbar = false;
    }
}
