//! Threaded filesystem backend.
//!
//! Requests become jobs on a channel shared by a small pool of worker
//! threads. Each job carries the candidate paths for one thumbnail and
//! a cancellation token; a worker reads candidates in order until one
//! decodes, and sends the result back. [`FsBackend::poll`]
//! drains results on the UI thread and drops any whose request was
//! cancelled in the meantime.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use thumbstream_types::error::{Result, ThumbError};
use thumbstream_types::{FetchError, PixelImage, StreamConfig, ThumbnailType};

use super::cancel::CancellationToken;
use super::decode::decode_image;
use crate::backend::{Completion, FetchBackend, ThumbnailRequest};
use crate::key::{ThumbnailKind, Ticket};
use crate::path::PathResolver;

struct Job {
    ticket: Ticket,
    candidates: Vec<PathBuf>,
    token: CancellationToken,
}

/// Load the first candidate that exists and decodes. A candidate that
/// fails to decode does not hide later ones; if none succeeds, the first
/// failure is reported.
fn load_first(candidates: &[PathBuf], token: &CancellationToken) -> std::result::Result<PixelImage, FetchError> {
    let mut first_err = None;
    for path in candidates {
        if token.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        let err = match std::fs::read(path) {
            Ok(data) => match decode_image(&data, path) {
                Ok(image) => return Ok(image),
                Err(e) => {
                    log::debug!("Skipping {}: {e}", path.display());
                    e
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => FetchError::Io(e),
        };
        if first_err.is_none() {
            first_err = Some(err);
        }
    }
    Err(first_err.unwrap_or(FetchError::NotFound))
}

fn worker_loop(jobs: Arc<Mutex<Receiver<Job>>>, results: Sender<Completion<PixelImage>>) {
    loop {
        let job = match jobs.lock() {
            Ok(rx) => rx.recv(),
            Err(_) => break,
        };
        // Sender dropped: the backend is shutting down.
        let Ok(job) = job else { break };

        if job.token.is_cancelled() {
            continue;
        }
        let result = load_first(&job.candidates, &job.token);
        if job.token.is_cancelled() {
            continue;
        }
        if let Err(FetchError::Io(e)) = &result {
            log::warn!("Thumbnail read failed for {}: {e}", job.ticket);
        }
        if results
            .send(Completion {
                ticket: job.ticket,
                result,
            })
            .is_err()
        {
            break;
        }
    }
}

/// Loads thumbnails from a `<root>/<system>/Named_*/` tree.
pub struct FsBackend {
    resolver: PathResolver,
    primary_type: ThumbnailType,
    secondary_type: ThumbnailType,
    jobs: Option<Sender<Job>>,
    results: Receiver<Completion<PixelImage>>,
    in_flight: HashMap<Ticket, CancellationToken>,
    workers: Vec<JoinHandle<()>>,
    released_bytes: usize,
}

impl FsBackend {
    /// Spawn `cfg.worker_threads` loaders for the playlist `system`.
    pub fn new(cfg: &StreamConfig, system: &str) -> Result<Self> {
        let resolver = PathResolver::new(&cfg.thumbnail_dir, system, cfg.allow_non_png);
        Self::with_resolver(resolver, cfg.primary_type, cfg.secondary_type, cfg.worker_threads)
    }

    pub fn with_resolver(
        resolver: PathResolver,
        primary_type: ThumbnailType,
        secondary_type: ThumbnailType,
        worker_threads: usize,
    ) -> Result<Self> {
        let (job_tx, job_rx) = mpsc::channel::<Job>();
        let (result_tx, result_rx) = mpsc::channel();
        let job_rx = Arc::new(Mutex::new(job_rx));

        let mut workers = Vec::with_capacity(worker_threads.max(1));
        for id in 0..worker_threads.max(1) {
            let jobs = Arc::clone(&job_rx);
            let results = result_tx.clone();
            let handle = thread::Builder::new()
                .name(format!("thumb-loader-{id}"))
                .spawn(move || worker_loop(jobs, results))
                .map_err(|e| ThumbError::Backend(format!("spawn thumbnail worker: {e}")))?;
            workers.push(handle);
        }
        log::debug!(
            "Thumbnail loader started: {} workers, root {}",
            workers.len(),
            resolver.root().display()
        );

        Ok(Self {
            resolver,
            primary_type,
            secondary_type,
            jobs: Some(job_tx),
            results: result_rx,
            in_flight: HashMap::new(),
            workers,
            released_bytes: 0,
        })
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    fn thumbnail_type(&self, kind: ThumbnailKind) -> ThumbnailType {
        match kind {
            ThumbnailKind::Primary => self.primary_type,
            ThumbnailKind::Secondary => self.secondary_type,
        }
    }

    /// Requests not yet delivered or cancelled.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Total pixel bytes handed back through `release`.
    pub fn released_bytes(&self) -> usize {
        self.released_bytes
    }
}

impl FetchBackend for FsBackend {
    type Image = PixelImage;

    fn request(&mut self, request: ThumbnailRequest<'_>) -> std::result::Result<(), FetchError> {
        let candidates = self
            .resolver
            .candidates(request.content, self.thumbnail_type(request.kind));
        if candidates.is_empty() {
            return Err(FetchError::NotFound);
        }
        let Some(jobs) = &self.jobs else {
            return Err(FetchError::Io(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "thumbnail loader stopped",
            )));
        };

        let token = CancellationToken::new();
        let job = Job {
            ticket: request.ticket,
            candidates,
            token: token.clone(),
        };
        jobs.send(job).map_err(|_| {
            FetchError::Io(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "thumbnail workers exited",
            ))
        })?;
        self.in_flight.insert(request.ticket, token);
        Ok(())
    }

    fn cancel(&mut self, ticket: Ticket) {
        if let Some(token) = self.in_flight.remove(&ticket) {
            token.cancel();
        }
    }

    fn poll(&mut self, out: &mut Vec<Completion<PixelImage>>) {
        while let Ok(completion) = self.results.try_recv() {
            if self.in_flight.remove(&completion.ticket).is_some() {
                out.push(completion);
            } else {
                log::trace!("Discarding result for cancelled {}", completion.ticket);
            }
        }
    }

    fn release(&mut self, image: PixelImage) {
        self.released_bytes += image.byte_size();
    }
}

impl Drop for FsBackend {
    fn drop(&mut self) {
        for token in self.in_flight.values() {
            token.cancel();
        }
        // Closing the job channel ends every worker loop.
        self.jobs.take();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                log::warn!("Thumbnail worker panicked");
            }
        }
    }
}
