//! Storage sinks for normalized images.

use std::io;
use std::path::PathBuf;

use tracing::debug;

/// Durable destination for normalized image bytes, addressed by identifier.
///
/// Identifiers are filesystem- and URL-safe single path segments. Writes to
/// distinct identifiers are independent; the pipeline issues them
/// sequentially.
pub trait ImageSink: Send + Sync {
    fn put(&self, identifier: &str, bytes: &[u8]) -> io::Result<()>;
}

/// Sink that writes each image as one file in a flat directory.
pub struct FsImageSink {
    dir: PathBuf,
}

impl FsImageSink {
    /// The directory must already exist; the composition root creates it
    /// at startup.
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl ImageSink for FsImageSink {
    fn put(&self, identifier: &str, bytes: &[u8]) -> io::Result<()> {
        let path = self.dir.join(identifier);
        std::fs::write(&path, bytes)?;
        debug!(path = %path.display(), size = bytes.len(), "Persisted extracted image");
        Ok(())
    }
}
