//! High-level image operations.
//!
//! These functions combine the dimension calculation with codec execution:
//! identify the source, compute the target size, then encode.

use super::backend::{CodecError, ImageCodec};
use super::calculations::{DimensionError, TargetSize, compute_target_size};
use super::params::{EncodeParams, Quality};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Dimension(#[from] DimensionError),
}

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, ProcessError>;

/// An encoded JPEG and the size it was encoded at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub data: Vec<u8>,
    pub size: TargetSize,
}

/// Plan an encode without executing it.
///
/// Only identifies the source; useful for testing parameter generation.
pub fn plan_encode(
    codec: &impl ImageCodec,
    data: &[u8],
    max_pixel_dimension: u32,
    quality: Quality,
) -> Result<EncodeParams> {
    let dims = codec.identify(data)?;
    let target = compute_target_size(
        i64::from(max_pixel_dimension),
        i64::from(dims.width),
        i64::from(dims.height),
    )?;
    Ok(EncodeParams { target, quality })
}

/// Bound `data` to `max_pixel_dimension` on its longer side and re-encode it
/// as JPEG at `quality`.
pub fn resize_for_pick(
    codec: &impl ImageCodec,
    data: &[u8],
    max_pixel_dimension: u32,
    quality: Quality,
) -> Result<EncodedImage> {
    let params = plan_encode(codec, data, max_pixel_dimension, quality)?;
    let encoded = codec.encode(data, &params)?;
    Ok(EncodedImage {
        data: encoded,
        size: params.target,
    })
}
