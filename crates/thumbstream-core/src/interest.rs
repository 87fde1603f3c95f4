//! The set of entry indices whose thumbnails should be resident.

use std::ops::RangeInclusive;

/// Visible rows plus up to two pinned indices (sidebar selection and
/// the last selection with resolved thumbnails). Rebuilt every frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterestSet {
    visible: Option<RangeInclusive<usize>>,
    pinned: [Option<usize>; 2],
}

impl InterestSet {
    pub fn new(visible: Option<RangeInclusive<usize>>) -> Self {
        Self {
            visible,
            pinned: [None; 2],
        }
    }

    /// Add `index` to the set regardless of visibility.
    pub fn pin(&mut self, index: usize) {
        if self.contains(index) {
            return;
        }
        if let Some(free) = self.pinned.iter_mut().find(|p| p.is_none()) {
            *free = Some(index);
        }
    }

    pub fn visible(&self) -> Option<&RangeInclusive<usize>> {
        self.visible.as_ref()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.visible.as_ref().is_some_and(|r| r.contains(&index))
            || self.pinned.contains(&Some(index))
    }

    /// Every index in the set, visible rows first.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.visible
            .clone()
            .into_iter()
            .flatten()
            .chain(self.pinned.iter().flatten().copied())
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_none() && self.pinned.iter().all(Option::is_none)
    }
}
