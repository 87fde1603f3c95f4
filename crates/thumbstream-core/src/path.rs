//! Thumbnail path resolution.
//!
//! Thumbnails live at `<root>/<system>/<Named_Type>/<image name>.png`.
//! The image name is tried in order: content file stem, label, label
//! shortened to the title (everything before the first `" ("`).

use std::path::{Path, PathBuf};

use thumbstream_types::ThumbnailType;

use crate::playlist::Content;

/// Extensions tried for each image name. `png` always comes first.
pub const THUMBNAIL_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "tga"];

/// Characters not allowed in No-Intro style thumbnail names.
const SCRUBBED: &[char] = &['&', '*', '/', ':', '`', '"', '<', '>', '?', '\\', '|'];

/// Replace characters that are invalid in thumbnail file names with `_`.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if SCRUBBED.contains(&c) { '_' } else { c })
        .collect()
}

/// Title part of a label: up to the first `" ("`. `None` when the
/// label has no such suffix (the short name would equal the label).
pub fn short_name(label: &str) -> Option<&str> {
    match label.find(" (") {
        Some(pos) if pos > 0 => Some(&label[..pos]),
        _ => None,
    }
}

fn strip_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}

/// Last path component of `path`, accepting both `/` and `\`.
fn base_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Name of the directory that contains `path`.
fn parent_dir_name(path: &str) -> Option<&str> {
    let (parent, _) = path.rsplit_once(['/', '\\'])?;
    let name = base_name(parent);
    (!name.is_empty()).then_some(name)
}

fn has_image_extension(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            THUMBNAIL_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// There is a single MAME thumbnail set for every MAME variant.
fn collapse_mame(system: &str) -> &str {
    if system.starts_with("MAME") {
        "MAME"
    } else {
        system
    }
}

/// Maps list entries to candidate thumbnail files.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
    system: String,
    allow_non_png: bool,
}

impl PathResolver {
    /// `system` is the playlist's own name, used when an entry has no
    /// `db_name`.
    pub fn new(root: impl Into<PathBuf>, system: impl Into<String>, allow_non_png: bool) -> Self {
        Self {
            root: root.into(),
            system: system.into(),
            allow_non_png,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn system(&self) -> &str {
        &self.system
    }

    /// Thumbnail system directory name for `content`.
    pub fn system_name<'a>(&'a self, content: &'a Content) -> Option<&'a str> {
        if !content.db_name.is_empty() {
            let db = collapse_mame(&content.db_name);
            // Core info may list several databases separated by `|`.
            let first = db.split('|').next().unwrap_or(db);
            let name = strip_extension(first);
            return (!name.is_empty()).then_some(name);
        }
        match self.system.as_str() {
            "" => None,
            // Mixed-system playlists: fall back to the content's folder.
            "history" | "favorites" => parent_dir_name(&content.path),
            system => Some(collapse_mame(system)),
        }
    }

    /// Candidate files for `content`, in lookup order. Empty when the
    /// entry can have no thumbnail.
    pub fn candidates(&self, content: &Content, kind: ThumbnailType) -> Vec<PathBuf> {
        if !content.is_valid() {
            return Vec::new();
        }
        let Some(system) = self.system_name(content) else {
            return Vec::new();
        };

        // Image viewer content is its own thumbnail.
        if system == "images_history" || content.core_name == "imageviewer" {
            return if has_image_extension(&content.path) {
                vec![PathBuf::from(&content.path)]
            } else {
                Vec::new()
            };
        }

        let dir = self.root.join(system).join(kind.dir_name());
        let dir = dir.as_path();
        let label = sanitize(content.display_label());
        let full = (!content.path.is_empty())
            .then(|| sanitize(strip_extension(base_name(&content.path))))
            .filter(|full| !full.is_empty() && *full != label);
        let short = short_name(content.display_label()).map(sanitize);

        let extensions: &[&str] = if self.allow_non_png {
            &THUMBNAIL_EXTENSIONS
        } else {
            &THUMBNAIL_EXTENSIONS[..1]
        };

        full.into_iter()
            .chain(std::iter::once(label))
            .chain(short)
            .filter(|name| !name.is_empty())
            .flat_map(|name| {
                extensions
                    .iter()
                    .map(move |ext| dir.join(format!("{name}.{ext}")))
            })
            .collect()
    }
}
