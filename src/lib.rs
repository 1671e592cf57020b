//! # Picture Chooser
//!
//! Let a user pick pictures from a library or take one with the camera, and
//! hand them back as JPEG streams scaled to a requested size.
//!
//! # Architecture: One Request at a Time
//!
//! ```text
//! caller ──choose/take──▶ PictureChooser ──begin──▶ RequestCoordinator (one slot)
//!                               │
//!                               └──launch──▶ PictureLauncher (platform UI)
//!
//! platform ──PlatformResult──▶ PictureChooser::handle_platform_result
//!                               │  read → identify → target size → encode
//!                               └──complete──▶ RequestCoordinator ──▶ callback
//! ```
//!
//! A request ends with exactly one callback: the pictures, or a cancellation.
//! Starting a second request while one is pending is a caller bug and fails
//! with [`CoordinatorError::RequestAlreadyPending`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`chooser`] | Public entry points: callback, outcome, and future flavours of every pick |
//! | [`coordinator`] | Single-slot request lifecycle and callback dispatch |
//! | [`request`] | Request kinds, validated options, delivered pictures, outcomes |
//! | [`imaging`] | Target size calculation and the pure-Rust decode/resize/encode codec |
//! | [`launcher`] | Platform launcher trait and the file-based desktop launcher |
//! | [`naming`] | Display names from paths and URIs |
//! | [`config`] | `picture-chooser.toml` loading, validation, and merging |
//! | [`output`] | CLI reporting and saving delivered pictures |
//!
//! # Design Decisions
//!
//! ## Explicit Coordinator, No Global State
//!
//! The pending slot lives in a [`RequestCoordinator`] owned by the chooser.
//! Several choosers can coexist (one per window, one per test) without
//! stepping on each other.
//!
//! ## Same-Context Delivery
//!
//! The coordinator is `!Sync` and uses `RefCell`, not a lock. Platform
//! adapters must report on the context that launched the request. Only the
//! per-item image work inside one result fans out to rayon.
//!
//! ## Never Upscale
//!
//! Pictures already inside the requested bound are re-encoded at their own
//! size. See [`imaging::compute_target_size`].

pub mod chooser;
pub mod config;
pub mod coordinator;
pub mod imaging;
pub mod launcher;
pub mod naming;
pub mod output;
pub mod request;

pub use chooser::{ChooserError, PendingPick, PictureChooser};
pub use coordinator::{CoordinatorError, RequestCoordinator};
pub use request::{
    CancelCause, ImageResult, ItemFailure, PickKind, PickOptions, PickOutcome, PickRequest,
    PickedImage,
};

#[cfg(test)]
pub(crate) mod test_helpers;
