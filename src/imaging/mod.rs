//! Image processing in pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `ImageDecoder::dimensions` + orientation |
//! | **Target size** | [`compute_target_size`] |
//! | **Resample → JPEG** | Lanczos3 + `JpegEncoder` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing an encode
//! - **Backend**: [`ImageCodec`] trait + [`RustCodec`]
//! - **Operations**: High-level functions combining calculations + codec

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{CodecError, Dimensions, ImageCodec};
pub use calculations::{DimensionError, TargetSize, compute_target_size};
pub use operations::{EncodedImage, ProcessError, plan_encode, resize_for_pick};
pub use params::{EncodeParams, Quality};
pub use rust_backend::{RustCodec, supported_input_extensions};
