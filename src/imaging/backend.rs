//! Image codec trait and shared types.
//!
//! The [`ImageCodec`] trait defines the two operations the chooser needs from
//! an imaging stack: identify (read the displayed pixel size) and encode
//! (decode, orient, resample, re-encode).
//!
//! The production implementation is
//! [`RustCodec`](super::rust_backend::RustCodec), built on the `image` crate.
//! Platform adapters that already have a native bitmap pipeline implement the
//! trait over it instead.

use super::params::EncodeParams;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image codecs.
///
/// Implementations must be `Sync`: the items of one multi-select result are
/// encoded in parallel.
pub trait ImageCodec: Sync {
    /// Pixel size of the image as it will be displayed, i.e. after the
    /// orientation recorded in the file has been applied.
    fn identify(&self, data: &[u8]) -> Result<Dimensions, CodecError>;

    /// Decode `data`, apply its orientation, resample to exactly
    /// `params.target` and encode the result as JPEG.
    fn encode(&self, data: &[u8], params: &EncodeParams) -> Result<Vec<u8>, CodecError>;
}
