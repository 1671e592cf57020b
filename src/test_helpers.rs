//! Shared test utilities for the picture-chooser test suite.
//!
//! Builds small in-memory images so codec and chooser tests never depend on
//! fixture files.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let data = jpeg_bytes(400, 300);
//! let rotated = jpeg_with_orientation(40, 20, 6);
//! ```

use image::codecs::jpeg::JpegEncoder;
use image::{ImageEncoder, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;

// =========================================================================
// Encoded images
// =========================================================================

/// A `width`x`height` gradient encoded as JPEG.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, 90)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    out
}

/// A `width`x`height` half-transparent PNG.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 200, 128])
    });
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

/// A JPEG carrying an EXIF orientation tag (1-8).
///
/// The stored pixels are `width`x`height`; orientations 5-8 display them
/// transposed.
pub fn jpeg_with_orientation(width: u32, height: u32, orientation: u16) -> Vec<u8> {
    let plain = jpeg_bytes(width, height);
    assert_eq!(&plain[..2], &[0xFF, 0xD8], "not a JPEG stream");

    let [hi, lo] = orientation.to_be_bytes();
    #[rustfmt::skip]
    let app1: [u8; 36] = [
        0xFF, 0xE1, 0x00, 0x22,
        b'E', b'x', b'i', b'f', 0x00, 0x00,
        // Big-endian TIFF header, first IFD at offset 8
        b'M', b'M', 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08,
        // One entry: Orientation (0x0112), SHORT, count 1
        0x00, 0x01,
        0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01, hi, lo, 0x00, 0x00,
        // No next IFD
        0x00, 0x00, 0x00, 0x00,
    ];

    let mut out = Vec::with_capacity(plain.len() + app1.len());
    out.extend_from_slice(&plain[..2]);
    out.extend_from_slice(&app1);
    out.extend_from_slice(&plain[2..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_images_decode_to_requested_size() {
        let jpeg = image::load_from_memory(&jpeg_bytes(30, 20)).unwrap();
        assert_eq!((jpeg.width(), jpeg.height()), (30, 20));
        let png = image::load_from_memory(&png_bytes(7, 9)).unwrap();
        assert_eq!((png.width(), png.height()), (7, 9));
    }

    #[test]
    fn orientation_segment_follows_soi() {
        let data = jpeg_with_orientation(8, 4, 6);
        assert_eq!(&data[..4], &[0xFF, 0xD8, 0xFF, 0xE1]);
        assert_eq!(&data[6..12], b"Exif\0\0");
        // Still a decodable JPEG with the stored pixel size
        let img = image::load_from_memory(&data).unwrap();
        assert_eq!((img.width(), img.height()), (8, 4));
    }
}
