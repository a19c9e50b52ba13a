//! PDF document walking: pages and their embedded raster images.
//!
//! Only Image XObjects referenced from a page's resource dictionary are
//! considered; vector graphics, fonts, and Form XObjects are ignored.

use std::io::Read;

use flate2::read::ZlibDecoder;
use lopdf::{Dictionary, Object, ObjectId, Stream};

use crate::error::ExtractError;

/// Parsed in-memory representation of an uploaded PDF, exposing its pages
/// in document order. Read-only; discarded after one extraction run.
pub struct PdfDocument {
    doc: lopdf::Document,
}

impl PdfDocument {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ExtractError> {
        let doc = lopdf::Document::load_mem(bytes).map_err(ExtractError::DocumentUnreadable)?;
        Ok(Self { doc })
    }

    /// Pages in page-number order.
    pub fn pages(&self) -> impl Iterator<Item = PdfPage<'_>> + '_ {
        self.doc
            .get_pages()
            .into_values()
            .map(|page_id| PdfPage {
                doc: &self.doc,
                page_id,
            })
    }
}

/// One page of a [`PdfDocument`]. No identity beyond its position.
pub struct PdfPage<'a> {
    doc: &'a lopdf::Document,
    page_id: ObjectId,
}

impl PdfPage<'_> {
    /// Embedded images in resource-dictionary order.
    ///
    /// Pages without resources or without an XObject dictionary simply have
    /// no images; that is not an error.
    pub fn images(&self) -> Vec<EmbeddedImage> {
        let Some(Object::Dictionary(resources)) = self.page_entry(b"Resources") else {
            return Vec::new();
        };
        let Some(Object::Dictionary(xobjects)) = resources
            .get(b"XObject")
            .ok()
            .and_then(|entry| resolve(self.doc, entry))
        else {
            return Vec::new();
        };

        let mut images = Vec::new();
        for (_name, entry) in xobjects.iter() {
            let Some(Object::Stream(stream)) = resolve(self.doc, entry) else {
                continue;
            };
            if !is_image(stream) {
                continue;
            }
            images.push(EmbeddedImage::from_stream(self.doc, stream));
        }
        images
    }

    fn page_entry(&self, key: &[u8]) -> Option<&Object> {
        let page = self.doc.get_object(self.page_id).ok()?.as_dict().ok()?;
        page.get(key).ok().and_then(|entry| resolve(self.doc, entry))
    }
}

/// Source encoding hint attached to an embedded image's raw payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceEncoding {
    /// Self-describing compressed raster (JPEG, JPEG 2000, ...); the codec
    /// sniffs the container format and rejects what it cannot decode.
    Encoded,
    /// Uncompressed 8-bit RGB pixel data.
    RawRgb { width: u32, height: u32 },
    /// Uncompressed 8-bit grayscale pixel data.
    RawGray { width: u32, height: u32 },
    /// A filter or color layout the codec cannot handle. Kept so the
    /// pipeline can fingerprint and log the image before skipping it.
    Unsupported(String),
}

/// One raster image blob found attached to a page, in its original
/// (possibly exotic) encoding. Transient: exists only during iteration.
pub struct EmbeddedImage {
    data: Vec<u8>,
    encoding: SourceEncoding,
}

impl EmbeddedImage {
    pub fn new(data: Vec<u8>, encoding: SourceEncoding) -> Self {
        Self { data, encoding }
    }

    fn from_stream(doc: &lopdf::Document, stream: &Stream) -> Self {
        let filters = stream_filters(stream);

        // Self-describing containers keep their bytes verbatim.
        if let Some(last) = filters.last() {
            if last == "DCTDecode" || last == "JPXDecode" {
                return Self::new(stream.content.clone(), SourceEncoding::Encoded);
            }
        }

        let data = match filters.as_slice() {
            [] => stream.content.clone(),
            [single] if single == "FlateDecode" => match inflate(&stream.content) {
                Some(data) => data,
                None => {
                    return Self::new(
                        stream.content.clone(),
                        SourceEncoding::Unsupported("corrupt FlateDecode stream".to_string()),
                    );
                }
            },
            other => {
                return Self::new(
                    stream.content.clone(),
                    SourceEncoding::Unsupported(other.join("+")),
                );
            }
        };

        let encoding = raw_encoding(doc, &stream.dict);
        Self::new(data, encoding)
    }

    /// Raw byte payload, as stored in the PDF after filter decoding.
    /// Fingerprinting happens on these bytes, before any normalization.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn encoding(&self) -> &SourceEncoding {
        &self.encoding
    }
}

fn resolve<'a>(doc: &'a lopdf::Document, object: &'a Object) -> Option<&'a Object> {
    match object {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

fn is_image(stream: &Stream) -> bool {
    matches!(
        stream.dict.get(b"Subtype"),
        Ok(Object::Name(name)) if name.as_slice() == b"Image"
    )
}

fn stream_filters(stream: &Stream) -> Vec<String> {
    match stream.dict.get(b"Filter") {
        Ok(Object::Name(name)) => vec![String::from_utf8_lossy(name).into_owned()],
        Ok(Object::Array(entries)) => entries
            .iter()
            .filter_map(|entry| match entry {
                Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn inflate(content: &[u8]) -> Option<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(content);
    let mut decoded = Vec::new();
    decoder.read_to_end(&mut decoded).ok()?;
    Some(decoded)
}

fn raw_encoding(doc: &lopdf::Document, dict: &Dictionary) -> SourceEncoding {
    let bits = int_entry(dict, b"BitsPerComponent").unwrap_or(8);
    if bits != 8 {
        return SourceEncoding::Unsupported(format!("{bits} bits per component"));
    }

    let (Some(width), Some(height)) = (int_entry(dict, b"Width"), int_entry(dict, b"Height"))
    else {
        return SourceEncoding::Unsupported("missing raster dimensions".to_string());
    };

    match name_entry(doc, dict, b"ColorSpace").as_deref() {
        Some("DeviceRGB") => SourceEncoding::RawRgb { width, height },
        Some("DeviceGray") => SourceEncoding::RawGray { width, height },
        Some(other) => SourceEncoding::Unsupported(format!("color space {other}")),
        None => SourceEncoding::Unsupported("unknown color space".to_string()),
    }
}

fn int_entry(dict: &Dictionary, key: &[u8]) -> Option<u32> {
    match dict.get(key) {
        Ok(Object::Integer(value)) if *value >= 0 => Some(*value as u32),
        _ => None,
    }
}

fn name_entry(doc: &lopdf::Document, dict: &Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key).ok().and_then(|entry| resolve(doc, entry)) {
        Some(Object::Name(name)) => Some(String::from_utf8_lossy(name).into_owned()),
        _ => None,
    }
}
