//! thumbstream demo.
//!
//! Usage: `thumbstream-app [playlist.lpl] [thumbstream.toml]`
//!
//! Streams thumbnails for a playlist while a scripted session scrolls,
//! flings, drags the scrollbar and browses the sidebar layout. Thumbnails
//! load from `thumbnail_dir` when it exists; otherwise a generated
//! in-memory set stands in. Run with `RUST_LOG=debug` to see every
//! request and eviction.

mod session;

use std::path::PathBuf;

use anyhow::{Context, Result};

use session::Session;
use thumbstream_core::{
    Content, FetchBackend, FsBackend, MemoryBackend, Playlist, ThumbnailCache, ThumbnailKind,
};
use thumbstream_types::{PixelImage, StreamConfig};

const ROW_HEIGHT: f32 = 48.0;
const VIEWPORT_HEIGHT: f32 = 480.0;
const DEMO_ENTRIES: usize = 500;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let playlist_path = args.next().map(PathBuf::from);
    let config_path = args
        .next()
        .or_else(|| std::env::var("THUMBSTREAM_CONFIG").ok())
        .map(PathBuf::from);

    let config = match &config_path {
        Some(path) => StreamConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => StreamConfig::default(),
    };
    let playlist = match &playlist_path {
        Some(path) => Playlist::load(path)
            .with_context(|| format!("loading playlist {}", path.display()))?,
        None => demo_playlist(),
    };
    log::info!("Starting thumbstream: {} entries from '{}'", playlist.len(), playlist.name);

    if config.thumbnail_dir.is_dir() {
        let backend = FsBackend::new(&config, &playlist.name)?;
        run(backend, config, playlist.items, true);
    } else {
        log::info!(
            "Thumbnail directory {} not found, using generated thumbnails",
            config.thumbnail_dir.display()
        );
        let backend = demo_backend(&playlist.items).with_latency(3);
        run(backend, config, playlist.items, false);
    }
    Ok(())
}

fn run<B: FetchBackend>(backend: B, config: StreamConfig, items: Vec<Content>, realtime: bool) {
    let len = items.len();
    let mut cache = ThumbnailCache::new(backend, config);
    cache.populate(items);

    let mut session = Session::new(cache, ROW_HEIGHT, VIEWPORT_HEIGHT, realtime);
    session.settle(30);
    session.fling(60.0);
    session.settle(30);
    session.drag_to(0.5, 20);
    session.settle(30);
    session.fling(-40.0);
    session.settle(30);
    session.repopulate();
    session.settle(30);
    session.browse_sidebar(&[len / 4, len / 4 + 1, len / 4 + 2, len / 2], 20);
    session.report();
}

fn demo_playlist() -> Playlist {
    let items = (0..DEMO_ENTRIES)
        .map(|i| Content::new(format!("/roms/demo/game{i:03}.zip"), format!("Demo Game {i:03}")))
        .collect();
    Playlist {
        name: "Demo System".into(),
        items,
    }
}

/// Boxart for two of every three entries, snaps for every other one.
fn demo_backend(items: &[Content]) -> MemoryBackend {
    let mut backend = MemoryBackend::new();
    for (i, content) in items.iter().enumerate() {
        let shade = (i * 37 % 200) as u8 + 40;
        if i % 3 != 2 {
            backend.insert(
                content.label.clone(),
                ThumbnailKind::Primary,
                PixelImage::solid(64, 90, [shade, 80, 160, 0xFF]),
            );
        }
        if i % 2 == 0 {
            backend.insert(
                content.label.clone(),
                ThumbnailKind::Secondary,
                PixelImage::solid(160, 120, [80, shade, 96, 0xFF]),
            );
        }
    }
    backend
}
