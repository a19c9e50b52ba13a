//! PDF embedded-image extraction.
//!
//! This module is the core of the service: it walks an uploaded PDF's
//! page/object structure for embedded raster images, deduplicates them by
//! raw content, normalizes every survivor to PNG, and persists each one to
//! an injected [`ImageSink`] under a role-derived identifier (the first
//! surviving image is the primary subject photo, the second the signature
//! image, the rest are anonymous).

pub mod codec;
pub mod hash;
pub mod naming;
pub mod pdf;
pub mod pipeline;
pub mod sink;

#[cfg(test)]
pub mod test_support;

pub use pdf::PdfDocument;
pub use pipeline::{ExtractionReport, ImageOutcome};
pub use sink::{FsImageSink, ImageSink};

use tracing::warn;

use crate::error::ExtractError;

/// Extraction entry point used by the HTTP layer.
///
/// Holds the storage sink the pipeline writes to; the sink is injected at
/// construction so storage location policy stays with the composition root.
pub struct ExtractionService {
    sink: Box<dyn ImageSink>,
}

impl ExtractionService {
    pub fn new(sink: impl ImageSink + 'static) -> Self {
        Self {
            sink: Box::new(sink),
        }
    }

    /// Parse the uploaded bytes and run the extraction pipeline.
    ///
    /// Bytes that cannot be parsed as a PDF yield an empty report rather
    /// than an error; the caller cannot distinguish that case from a PDF
    /// with no embedded images.
    pub fn extract_from_bytes(&self, bytes: &[u8]) -> Result<ExtractionReport, ExtractError> {
        let document = match PdfDocument::from_bytes(bytes) {
            Ok(document) => document,
            Err(error) => {
                warn!(%error, "Uploaded bytes are not a readable PDF, returning no images");
                return Ok(ExtractionReport::default());
            }
        };

        pipeline::extract(&document, self.sink.as_ref())
    }
}
