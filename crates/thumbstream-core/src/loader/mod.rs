//! Fetch backends shipped with the crate.

pub mod cancel;
pub mod decode;
pub mod fs;
pub mod memory;

pub use cancel::CancellationToken;
pub use decode::{decode_image, decode_png};
pub use fs::FsBackend;
pub use memory::MemoryBackend;
