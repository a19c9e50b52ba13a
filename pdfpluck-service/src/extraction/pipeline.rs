//! The extraction pipeline: dedupe, normalize, name, persist.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::ExtractError;

use super::codec;
use super::hash::{self, ContentFingerprint};
use super::naming;
use super::pdf::PdfDocument;
use super::sink::ImageSink;

/// What happened to one embedded image during a run, in encounter order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    /// Normalized and persisted under the given identifier.
    Saved { identifier: String },
    /// Raw bytes matched an image already handled earlier in this run.
    DuplicateSkipped,
    /// The codec could not decode or re-encode the image.
    NormalizeFailed,
}

/// Ordered per-image outcomes of one extraction run.
#[derive(Debug, Default)]
pub struct ExtractionReport {
    pub outcomes: Vec<ImageOutcome>,
}

impl ExtractionReport {
    /// Identifiers of persisted images, in the order their source images
    /// were first encountered.
    pub fn saved_identifiers(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                ImageOutcome::Saved { identifier } => Some(identifier.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn duplicate_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome, ImageOutcome::DuplicateSkipped))
            .count()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome, ImageOutcome::NormalizeFailed))
            .count()
    }
}

/// Walk the document in page order, deduplicate embedded images by raw
/// content, normalize survivors to PNG, and persist each one to the sink.
///
/// Per-image normalization failures are logged and skipped. A sink write
/// failure aborts the run; images persisted before the failure stay put.
pub fn extract(
    document: &PdfDocument,
    sink: &dyn ImageSink,
) -> Result<ExtractionReport, ExtractError> {
    let mut seen: HashSet<ContentFingerprint> = HashSet::new();
    let mut outcomes = Vec::new();
    let mut saved_count = 0usize;

    for (page_index, page) in document.pages().enumerate() {
        for (image_index, image) in page.images().into_iter().enumerate() {
            let fingerprint = hash::fingerprint(image.data());
            if !seen.insert(fingerprint.clone()) {
                debug!(
                    page = page_index + 1,
                    image = image_index,
                    fingerprint = %fingerprint,
                    "Skipping duplicate image"
                );
                outcomes.push(ImageOutcome::DuplicateSkipped);
                continue;
            }

            // The fingerprint stays marked seen even when normalization
            // fails, so a byte-identical duplicate is not re-attempted.
            let normalized = match codec::normalize_to_png(&image) {
                Ok(bytes) => bytes,
                Err(error) => {
                    warn!(
                        page = page_index + 1,
                        image = image_index,
                        %error,
                        "Failed to process image"
                    );
                    outcomes.push(ImageOutcome::NormalizeFailed);
                    continue;
                }
            };

            // Roles follow the position among successfully normalized
            // images, not the raw encounter index.
            let identifier = naming::assign_identifier(saved_count);
            saved_count += 1;

            sink.put(&identifier, &normalized)
                .map_err(|source| ExtractError::SinkWrite {
                    identifier: identifier.clone(),
                    source,
                })?;
            outcomes.push(ImageOutcome::Saved { identifier });
        }
    }

    Ok(ExtractionReport { outcomes })
}
