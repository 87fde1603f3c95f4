//! Identities for entries, thumbnail slots, and in-flight requests.

use std::fmt;

use thumbstream_ui::AnimTag;

/// Identity of a registry entry.
///
/// Assigned when a list is populated and never reused by the same
/// registry, so a late result for a replaced entry can never match the
/// entry that now sits at the same index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which of an entry's two thumbnails a slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ThumbnailKind {
    Primary,
    Secondary,
}

impl ThumbnailKind {
    pub const ALL: [ThumbnailKind; 2] = [ThumbnailKind::Primary, ThumbnailKind::Secondary];

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Primary => 0,
            Self::Secondary => 1,
        }
    }
}

impl fmt::Display for ThumbnailKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Secondary => write!(f, "secondary"),
        }
    }
}

/// Deduplication key: one per (entry, kind).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ThumbnailKey {
    pub entry: EntryId,
    pub kind: ThumbnailKind,
}

impl ThumbnailKey {
    pub fn new(entry: EntryId, kind: ThumbnailKind) -> Self {
        Self { entry, kind }
    }

    /// Animation tag for this slot's alpha.
    pub fn anim_tag(&self) -> AnimTag {
        AnimTag((self.entry.0 << 1) | self.kind.index() as u64)
    }

    /// Inverse of [`ThumbnailKey::anim_tag`].
    pub fn from_anim_tag(tag: AnimTag) -> Self {
        let kind = if tag.0 & 1 == 0 {
            ThumbnailKind::Primary
        } else {
            ThumbnailKind::Secondary
        };
        Self {
            entry: EntryId(tag.0 >> 1),
            kind,
        }
    }
}

impl fmt::Display for ThumbnailKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.entry, self.kind)
    }
}

/// One issued request: the slot key plus the slot generation at the
/// time of issue. A completion is applied only if both still match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub key: ThumbnailKey,
    pub generation: u64,
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.key, self.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anim_tag_roundtrip() {
        for kind in ThumbnailKind::ALL {
            let key = ThumbnailKey::new(EntryId(12345), kind);
            assert_eq!(ThumbnailKey::from_anim_tag(key.anim_tag()), key);
        }
    }

    #[test]
    fn anim_tags_are_distinct_per_kind() {
        let p = ThumbnailKey::new(EntryId(9), ThumbnailKind::Primary).anim_tag();
        let s = ThumbnailKey::new(EntryId(9), ThumbnailKind::Secondary).anim_tag();
        assert_ne!(p, s);
    }

    #[test]
    fn display_formats() {
        let key = ThumbnailKey::new(EntryId(4), ThumbnailKind::Secondary);
        assert_eq!(key.to_string(), "#4/secondary");
        let ticket = Ticket { key, generation: 2 };
        assert_eq!(ticket.to_string(), "#4/secondary@2");
    }
}
