//! Playlist entries and RetroArch-style `.lpl` playlist loading.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thumbstream_types::error::{Result, ThumbError};

/// What a list entry points at. Drives thumbnail path resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Content {
    /// Path to the content file.
    pub path: String,
    /// Display name; also the preferred thumbnail image name.
    pub label: String,
    /// Core that runs this content (e.g. `imageviewer`).
    pub core_name: String,
    /// Database name, e.g. `Nintendo - Game Boy.lpl`. Names the
    /// thumbnail system directory when set.
    pub db_name: String,
}

impl Content {
    pub fn new(path: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            label: label.into(),
            ..Self::default()
        }
    }

    /// Builder-style setter for `db_name`.
    pub fn with_db_name(mut self, db_name: impl Into<String>) -> Self {
        self.db_name = db_name.into();
        self
    }

    /// Builder-style setter for `core_name`.
    pub fn with_core_name(mut self, core_name: impl Into<String>) -> Self {
        self.core_name = core_name.into();
        self
    }

    /// Content with neither a path nor a label has no thumbnail.
    pub fn is_valid(&self) -> bool {
        !self.path.is_empty() || !self.label.is_empty()
    }

    /// Label, falling back to the file name of `path`.
    pub fn display_label(&self) -> &str {
        if !self.label.is_empty() {
            return &self.label;
        }
        Path::new(&self.path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.path)
    }
}

/// On-disk playlist item. Only the fields thumbnails need are kept;
/// unknown keys are ignored.
#[derive(Debug, Deserialize)]
struct PlaylistItem {
    #[serde(default)]
    path: String,
    #[serde(default)]
    label: String,
    #[serde(default)]
    core_name: String,
    #[serde(default)]
    db_name: String,
}

#[derive(Debug, Deserialize)]
struct PlaylistFile {
    #[serde(default)]
    items: Vec<PlaylistItem>,
}

/// A loaded playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    /// File stem, e.g. `Nintendo - Game Boy`. Used as the fallback
    /// thumbnail system name.
    pub name: String,
    pub items: Vec<Content>,
}

impl Playlist {
    /// Parse a JSON playlist. `name` is the playlist's file stem.
    pub fn from_json(name: &str, text: &str) -> Result<Self> {
        let file: PlaylistFile = serde_json::from_str(text)
            .map_err(|e| ThumbError::Playlist(format!("{name}: {e}")))?;
        let items = file
            .items
            .into_iter()
            .map(|item| Content {
                path: item.path,
                label: item.label,
                core_name: item.core_name,
                db_name: item.db_name,
            })
            .collect();
        Ok(Self {
            name: name.to_string(),
            items,
        })
    }

    /// Load a `.lpl` file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ThumbError::Playlist(format!("bad playlist path: {}", path.display())))?;
        let playlist = Self::from_json(name, &text)?;
        log::info!(
            "Loaded playlist '{}' ({} entries)",
            playlist.name,
            playlist.items.len()
        );
        Ok(playlist)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
      "version": "1.5",
      "default_core_path": "",
      "items": [
        {
          "path": "/roms/gb/Tetris (World) (Rev 1).zip",
          "label": "Tetris (World) (Rev 1)",
          "core_path": "DETECT",
          "core_name": "DETECT",
          "crc32": "46DF91AD|crc",
          "db_name": "Nintendo - Game Boy.lpl"
        },
        {
          "path": "/roms/gb/Dr. Mario.zip",
          "label": "Dr. Mario (World)"
        }
      ]
    }"#;

    #[test]
    fn parse_retroarch_playlist() {
        let pl = Playlist::from_json("Nintendo - Game Boy", SAMPLE).unwrap();
        assert_eq!(pl.len(), 2);
        assert_eq!(pl.items[0].label, "Tetris (World) (Rev 1)");
        assert_eq!(pl.items[0].db_name, "Nintendo - Game Boy.lpl");
        assert_eq!(pl.items[1].db_name, "");
        assert!(pl.items.iter().all(Content::is_valid));
    }

    #[test]
    fn missing_items_is_empty_playlist() {
        let pl = Playlist::from_json("empty", r#"{"version": "1.5"}"#).unwrap();
        assert!(pl.is_empty());
    }

    #[test]
    fn malformed_json_is_playlist_error() {
        let err = Playlist::from_json("bad", "{ items: ").unwrap_err();
        assert!(matches!(err, ThumbError::Playlist(_)));
    }

    #[test]
    fn load_uses_file_stem_as_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Sega - Mega Drive - Genesis.lpl");
        std::fs::write(&path, SAMPLE).unwrap();
        let pl = Playlist::load(&path).unwrap();
        assert_eq!(pl.name, "Sega - Mega Drive - Genesis");
        assert_eq!(pl.len(), 2);
    }

    #[test]
    fn content_validity() {
        assert!(!Content::default().is_valid());
        assert!(Content::new("", "Label only").is_valid());
        assert!(Content::new("/roms/a.zip", "").is_valid());
    }

    #[test]
    fn display_label_falls_back_to_file_name() {
        assert_eq!(Content::new("/roms/a.zip", "").display_label(), "a.zip");
        assert_eq!(Content::new("/roms/a.zip", "Alpha").display_label(), "Alpha");
    }
}
