//! Test fixtures: real PDFs assembled object-by-object with lopdf, plus
//! in-memory sinks for observing pipeline writes.

use std::io::{Cursor, Write};
use std::sync::{Arc, Mutex};

use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use lopdf::{Document, Object, Stream, dictionary};

use super::sink::ImageSink;

/// One Image XObject to embed in a fixture page.
pub enum TestImage {
    RawRgb { width: i64, height: i64, data: Vec<u8> },
    RawGray { width: i64, height: i64, data: Vec<u8> },
    /// DCTDecode stream; payload may be a real JPEG or garbage.
    Encoded { data: Vec<u8> },
    FlateRgb { width: i64, height: i64, data: Vec<u8> },
    Filtered { filter: &'static str, data: Vec<u8> },
}

impl TestImage {
    pub fn raw_rgb(width: i64, height: i64, data: Vec<u8>) -> Self {
        TestImage::RawRgb { width, height, data }
    }

    pub fn raw_gray(width: i64, height: i64, data: Vec<u8>) -> Self {
        TestImage::RawGray { width, height, data }
    }

    pub fn encoded(data: Vec<u8>) -> Self {
        TestImage::Encoded { data }
    }

    pub fn flate_rgb(width: i64, height: i64, data: Vec<u8>) -> Self {
        TestImage::FlateRgb { width, height, data }
    }

    pub fn filtered(filter: &'static str, data: Vec<u8>) -> Self {
        TestImage::Filtered { filter, data }
    }

    fn to_stream(&self) -> Stream {
        match self {
            TestImage::RawRgb { width, height, data } => Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => *width,
                    "Height" => *height,
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8i64,
                },
                data.clone(),
            ),
            TestImage::RawGray { width, height, data } => Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => *width,
                    "Height" => *height,
                    "ColorSpace" => "DeviceGray",
                    "BitsPerComponent" => 8i64,
                },
                data.clone(),
            ),
            TestImage::Encoded { data } => Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => 8i64,
                    "Height" => 8i64,
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8i64,
                    "Filter" => "DCTDecode",
                },
                data.clone(),
            ),
            TestImage::FlateRgb { width, height, data } => {
                let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(data).unwrap();
                let compressed = encoder.finish().unwrap();
                Stream::new(
                    dictionary! {
                        "Type" => "XObject",
                        "Subtype" => "Image",
                        "Width" => *width,
                        "Height" => *height,
                        "ColorSpace" => "DeviceRGB",
                        "BitsPerComponent" => 8i64,
                        "Filter" => "FlateDecode",
                    },
                    compressed,
                )
            }
            TestImage::Filtered { filter, data } => Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => 2i64,
                    "Height" => 2i64,
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8i64,
                    "Filter" => *filter,
                },
                data.clone(),
            ),
        }
    }
}

/// Build a complete PDF with one entry in `pages` per page, each embedding
/// its images as Image XObjects Im0, Im1, ... in order.
pub fn build_pdf(pages: &[Vec<TestImage>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for images in pages {
        let mut xobjects = lopdf::Dictionary::new();
        let mut content_ops = String::from("q");
        for (index, image) in images.iter().enumerate() {
            let image_id = doc.add_object(Object::Stream(image.to_stream()));
            xobjects.set(format!("Im{index}").into_bytes(), Object::Reference(image_id));
            content_ops.push_str(&format!(" /Im{index} Do"));
        }
        content_ops.push_str(" Q");

        let content_id = doc.add_object(Object::Stream(Stream::new(
            lopdf::Dictionary::new(),
            content_ops.into_bytes(),
        )));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => Object::Dictionary(dictionary! {
                "XObject" => Object::Dictionary(xobjects),
            }),
        });
        kids.push(Object::from(page_id));
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("failed to serialize test PDF");
    buf
}

/// Uniform 8-bit RGB pixel data.
pub fn rgb_pixels(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for _ in 0..width * height {
        data.extend_from_slice(&rgb);
    }
    data
}

/// A small real JPEG with the given uniform color.
pub fn jpeg_bytes(rgb: [u8; 3]) -> Vec<u8> {
    let mut pixels = RgbImage::new(8, 8);
    for pixel in pixels.pixels_mut() {
        *pixel = Rgb(rgb);
    }
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(pixels)
        .write_to(&mut buf, ImageFormat::Jpeg)
        .unwrap();
    buf.into_inner()
}

/// A small real PNG with a semi-transparent alpha channel.
pub fn png_with_alpha() -> Vec<u8> {
    let mut pixels = RgbaImage::new(4, 4);
    for pixel in pixels.pixels_mut() {
        *pixel = Rgba([10, 20, 30, 128]);
    }
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(pixels)
        .write_to(&mut buf, ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

/// Sink recording writes in memory, cloneable so tests can keep a handle
/// after moving it into a service.
#[derive(Clone, Default)]
pub struct MemorySink {
    files: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
}

impl MemorySink {
    pub fn files(&self) -> Vec<(String, Vec<u8>)> {
        self.files.lock().unwrap().clone()
    }
}

impl ImageSink for MemorySink {
    fn put(&self, identifier: &str, bytes: &[u8]) -> std::io::Result<()> {
        self.files
            .lock()
            .unwrap()
            .push((identifier.to_string(), bytes.to_vec()));
        Ok(())
    }
}

/// Sink whose every write fails.
pub struct FailingSink;

impl ImageSink for FailingSink {
    fn put(&self, _identifier: &str, _bytes: &[u8]) -> std::io::Result<()> {
        Err(std::io::Error::other("sink unavailable"))
    }
}
