//! Pure Rust codec on top of the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::ImageReader` with format sniffing |
//! | Orientation | `ImageDecoder::orientation` + `DynamicImage::apply_orientation` |
//! | Resample | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder::new_with_quality` |
//!
//! Orientation is whatever the decoder reports; no EXIF parsing happens here.

use super::backend::{CodecError, Dimensions, ImageCodec};
use super::params::EncodeParams;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader};
use log::{debug, trace};
use std::io::Cursor;
use std::sync::LazyLock;

/// Extensions whose decoders are compiled in.
const PHOTO_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PHOTO_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Codec using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustCodec;

impl RustCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn reader(data: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, CodecError> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(CodecError::Io)
}

fn decode_error(e: image::ImageError) -> CodecError {
    CodecError::Decode(e.to_string())
}

/// True when the orientation swaps width and height.
fn is_transposed(orientation: Orientation) -> bool {
    matches!(
        orientation,
        Orientation::Rotate90
            | Orientation::Rotate270
            | Orientation::Rotate90FlipH
            | Orientation::Rotate270FlipH
    )
}

/// Decode and apply the orientation stored in the file.
fn load_oriented(data: &[u8]) -> Result<DynamicImage, CodecError> {
    let mut decoder = reader(data)?.into_decoder().map_err(decode_error)?;
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
    let mut img = DynamicImage::from_decoder(decoder).map_err(decode_error)?;
    if orientation != Orientation::NoTransforms {
        debug!("Applying orientation {orientation:?}");
        img.apply_orientation(orientation);
    }
    Ok(img)
}

/// Encode as baseline JPEG. JPEG carries no alpha, so the image is flattened to RGB8.
fn encode_jpeg(img: &DynamicImage, quality: u32) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100) as u8);
    DynamicImage::ImageRgb8(img.to_rgb8())
        .write_with_encoder(encoder)
        .map_err(|e| CodecError::Encode(e.to_string()))?;
    Ok(buf)
}

impl ImageCodec for RustCodec {
    fn identify(&self, data: &[u8]) -> Result<Dimensions, CodecError> {
        let mut decoder = reader(data)?.into_decoder().map_err(decode_error)?;
        let (width, height) = decoder.dimensions();
        let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
        if is_transposed(orientation) {
            Ok(Dimensions {
                width: height,
                height: width,
            })
        } else {
            Ok(Dimensions { width, height })
        }
    }

    fn encode(&self, data: &[u8], params: &EncodeParams) -> Result<Vec<u8>, CodecError> {
        let img = load_oriented(data)?;
        let (w, h) = (params.target.width, params.target.height);
        let resized = if img.width() == w && img.height() == h {
            img
        } else {
            trace!("Resampling {}x{} to {w}x{h}", img.width(), img.height());
            img.resize_exact(w, h, FilterType::Lanczos3)
        };
        encode_jpeg(&resized, params.quality.value())
    }
}
