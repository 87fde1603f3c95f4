//! Visible-row tracking for virtualized lists.
//!
//! Row positions come from the layout pass; this module only answers
//! "which rows intersect the viewport this frame".

use std::ops::RangeInclusive;

/// Vertical extent of one row in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowGeometry {
    pub y: f32,
    pub height: f32,
}

/// The visible window onto the list for one frame.
///
/// `top`/`bottom` are screen coordinates (e.g. `top` is the header
/// height), `scroll_y` is the content offset scrolled past.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportGeometry {
    pub scroll_y: f32,
    pub top: f32,
    pub bottom: f32,
}

impl ViewportGeometry {
    pub fn new(scroll_y: f32, top: f32, bottom: f32) -> Self {
        Self {
            scroll_y,
            top,
            bottom,
        }
    }

    /// Whether a row at content position `y` with height `height`
    /// overlaps the viewport. Partial overlap counts; a row whose
    /// bottom edge sits exactly on `top` does not.
    pub fn intersects(&self, y: f32, height: f32) -> bool {
        let screen_y = y - self.scroll_y;
        screen_y + height > self.top && screen_y <= self.bottom
    }
}

/// Row layout of a list, as produced by the layout pass.
#[derive(Debug, Clone, PartialEq)]
pub enum RowLayout {
    /// Every row has the same height; lookups are O(1).
    Uniform {
        first_entry_y: f32,
        row_height: f32,
        count: usize,
    },
    /// Rows sorted by `y`, non-overlapping; lookups are O(log n).
    Variable(Vec<RowGeometry>),
}

impl RowLayout {
    pub fn uniform(first_entry_y: f32, row_height: f32, count: usize) -> Self {
        Self::Uniform {
            first_entry_y,
            row_height,
            count,
        }
    }

    /// Build a variable layout by stacking `heights` from `first_entry_y`.
    pub fn stacked(first_entry_y: f32, heights: &[f32]) -> Self {
        let mut y = first_entry_y;
        let rows = heights
            .iter()
            .map(|&h| {
                let row = RowGeometry { y, height: h };
                y += h;
                row
            })
            .collect();
        Self::Variable(rows)
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Uniform { count, .. } => *count,
            Self::Variable(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total content height from the first row's top to the last row's
    /// bottom.
    pub fn content_height(&self) -> f32 {
        match self {
            Self::Uniform {
                row_height, count, ..
            } => row_height * *count as f32,
            Self::Variable(rows) => match (rows.first(), rows.last()) {
                (Some(first), Some(last)) => last.y + last.height - first.y,
                _ => 0.0,
            },
        }
    }

    /// Geometry of row `index`, if it exists.
    pub fn row(&self, index: usize) -> Option<RowGeometry> {
        match self {
            Self::Uniform {
                first_entry_y,
                row_height,
                count,
            } => (index < *count).then(|| RowGeometry {
                y: first_entry_y + index as f32 * row_height,
                height: *row_height,
            }),
            Self::Variable(rows) => rows.get(index).copied(),
        }
    }

    /// First and last visible row, or `None` if nothing is on screen.
    pub fn visible_range(&self, view: &ViewportGeometry) -> Option<RangeInclusive<usize>> {
        if view.bottom < view.top {
            return None;
        }
        match self {
            Self::Uniform {
                first_entry_y,
                row_height,
                count,
            } => {
                if *count == 0 || *row_height <= 0.0 {
                    return None;
                }
                let above = view.top + view.scroll_y - first_entry_y;
                let below = view.bottom + view.scroll_y - first_entry_y;
                if below < 0.0 {
                    return None;
                }
                let first = (above / row_height).floor().max(0.0) as usize;
                let last = ((below / row_height).floor() as usize).min(count - 1);
                (first <= last).then_some(first..=last)
            }
            Self::Variable(rows) => {
                let first =
                    rows.partition_point(|r| r.y - view.scroll_y + r.height <= view.top);
                let end = rows.partition_point(|r| r.y - view.scroll_y <= view.bottom);
                (first < end).then(|| first..=end - 1)
            }
        }
    }
}
