//! Ordered list of entries and their thumbnail slots.

use std::collections::HashMap;

use crate::key::{EntryId, ThumbnailKind};
use crate::playlist::Content;
use crate::slot::ThumbnailSlot;

/// One row of the list.
#[derive(Debug)]
pub struct Entry<I> {
    id: EntryId,
    content: Content,
    slots: [ThumbnailSlot<I>; 2],
}

impl<I> Entry<I> {
    fn new(id: EntryId, content: Content) -> Self {
        Self {
            id,
            content,
            slots: [ThumbnailSlot::new(), ThumbnailSlot::new()],
        }
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn slot(&self, kind: ThumbnailKind) -> &ThumbnailSlot<I> {
        &self.slots[kind.index()]
    }

    pub(crate) fn slot_mut(&mut self, kind: ThumbnailKind) -> &mut ThumbnailSlot<I> {
        &mut self.slots[kind.index()]
    }

    /// Content alongside a mutable slot, for issuing requests.
    pub(crate) fn split_mut(&mut self, kind: ThumbnailKind) -> (&Content, &mut ThumbnailSlot<I>) {
        (&self.content, &mut self.slots[kind.index()])
    }
}

/// Owns every entry. Ids are handed out from a counter that is never
/// rewound, so an id names at most one entry over the registry's life.
#[derive(Debug)]
pub struct EntryRegistry<I> {
    entries: Vec<Entry<I>>,
    index: HashMap<EntryId, usize>,
    next_id: u64,
}

impl<I> Default for EntryRegistry<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> EntryRegistry<I> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            next_id: 0,
        }
    }

    /// Replace the list. The old entries are returned so the caller can
    /// tear their slots down.
    pub(crate) fn replace(&mut self, contents: Vec<Content>) -> Vec<Entry<I>> {
        let old = std::mem::take(&mut self.entries);
        self.index.clear();
        self.entries.reserve(contents.len());
        for content in contents {
            let id = EntryId(self.next_id);
            self.next_id += 1;
            self.index.insert(id, self.entries.len());
            self.entries.push(Entry::new(id, content));
        }
        old
    }

    /// Remove the entry at `index`, shifting later entries up.
    pub(crate) fn remove(&mut self, index: usize) -> Option<Entry<I>> {
        if index >= self.entries.len() {
            return None;
        }
        let entry = self.entries.remove(index);
        self.index.remove(&entry.id);
        for (i, e) in self.entries.iter().enumerate().skip(index) {
            self.index.insert(e.id, i);
        }
        Some(entry)
    }

    /// Take every entry out, leaving the registry empty. Ids keep
    /// counting from where they were.
    pub(crate) fn drain(&mut self) -> std::vec::Drain<'_, Entry<I>> {
        self.index.clear();
        self.entries.drain(..)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Entry<I>> {
        self.entries.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Entry<I>> {
        self.entries.get_mut(index)
    }

    /// Current index of `id`, if it is still in the list.
    pub fn index_of(&self, id: EntryId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub(crate) fn by_id_mut(&mut self, id: EntryId) -> Option<&mut Entry<I>> {
        let index = self.index_of(id)?;
        self.entries.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry<I>> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(n: usize) -> Vec<Content> {
        (0..n).map(|i| Content::new(format!("/roms/{i}.zip"), format!("Game {i}"))).collect()
    }

    #[test]
    fn populate_assigns_sequential_ids() {
        let mut reg: EntryRegistry<()> = EntryRegistry::new();
        assert!(reg.replace(contents(3)).is_empty());
        assert_eq!(reg.len(), 3);
        let ids: Vec<_> = reg.iter().map(Entry::id).collect();
        assert_eq!(ids, vec![EntryId(0), EntryId(1), EntryId(2)]);
        assert_eq!(reg.index_of(EntryId(2)), Some(2));
    }

    #[test]
    fn ids_are_not_reused_across_repopulation() {
        let mut reg: EntryRegistry<()> = EntryRegistry::new();
        reg.replace(contents(2));
        let old = reg.replace(contents(2));
        assert_eq!(old.len(), 2);
        assert_eq!(reg.get(0).unwrap().id(), EntryId(2));
        assert_eq!(reg.index_of(EntryId(0)), None);
    }

    #[test]
    fn remove_reindexes_following_entries() {
        let mut reg: EntryRegistry<()> = EntryRegistry::new();
        reg.replace(contents(4));
        let removed = reg.remove(1).unwrap();
        assert_eq!(removed.id(), EntryId(1));
        assert_eq!(reg.index_of(EntryId(1)), None);
        assert_eq!(reg.index_of(EntryId(2)), Some(1));
        assert_eq!(reg.index_of(EntryId(3)), Some(2));
        assert!(reg.remove(10).is_none());
    }

    #[test]
    fn lookup_by_id() {
        let mut reg: EntryRegistry<()> = EntryRegistry::new();
        reg.replace(contents(2));
        let entry = reg.by_id_mut(EntryId(1)).unwrap();
        assert_eq!(entry.content().label, "Game 1");
        assert!(reg.by_id_mut(EntryId(7)).is_none());
    }
}
