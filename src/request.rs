//! Request and outcome types shared by the coordinator and the chooser.
//!
//! A request ends in exactly one [`PickOutcome`]. The original two-callback
//! shape (`on_available` / `on_cancelled`) is still offered through
//! [`PickRequest::with_callbacks`], which folds both closures into the single
//! `FnOnce` the coordinator stores, so only one of them can ever run.

use crate::imaging::{DimensionError, EncodedImage, Quality, TargetSize};
use std::fmt;
use std::io::Cursor;

/// What the platform is asked to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickKind {
    /// Gallery / file picker, one item.
    PickSingle,
    /// Gallery / file picker, any number of items.
    PickMultiple,
    /// Camera capture, one item.
    Capture,
}

impl PickKind {
    pub fn allows_multiple(self) -> bool {
        matches!(self, PickKind::PickMultiple)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PickKind::PickSingle => "pick-single",
            PickKind::PickMultiple => "pick-multiple",
            PickKind::Capture => "capture",
        }
    }
}

impl fmt::Display for PickKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated size and quality parameters of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickOptions {
    max_pixel_dimension: u32,
    quality: Quality,
}

impl PickOptions {
    /// `max_pixel_dimension` must be positive; `percent_quality` is clamped to 1-100.
    pub fn new(max_pixel_dimension: i64, percent_quality: u32) -> Result<Self, DimensionError> {
        let max_pixel_dimension = u32::try_from(max_pixel_dimension)
            .ok()
            .filter(|&m| m > 0)
            .ok_or_else(|| {
                DimensionError::InvalidArgument(format!(
                    "max pixel dimension must be a positive 32-bit value, got {max_pixel_dimension}"
                ))
            })?;
        Ok(Self {
            max_pixel_dimension,
            quality: Quality::new(percent_quality),
        })
    }

    pub fn max_pixel_dimension(&self) -> u32 {
        self.max_pixel_dimension
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }
}

/// One delivered picture: a readable JPEG stream and its display name.
///
/// The stream is positioned at the start and owned by the receiver.
pub struct PickedImage {
    pub name: String,
    pub stream: Cursor<Vec<u8>>,
    pub width: u32,
    pub height: u32,
}

impl PickedImage {
    pub fn new(name: impl Into<String>, encoded: EncodedImage) -> Self {
        Self {
            name: name.into(),
            stream: Cursor::new(encoded.data),
            width: encoded.size.width,
            height: encoded.size.height,
        }
    }

    pub fn size(&self) -> TargetSize {
        TargetSize {
            width: self.width,
            height: self.height,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        self.stream.get_ref()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.stream.into_inner()
    }
}

impl fmt::Debug for PickedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PickedImage")
            .field("name", &self.name)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.stream.get_ref().len())
            .finish()
    }
}

/// Pictures of a completed request, in selection order.
pub type ImageResult = Vec<PickedImage>;

/// Why one selected item was left out of the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub item: String,
    pub reason: String,
}

/// Diagnostic attached to a cancellation.
///
/// Callers using the two-callback API never see this: for them a failed
/// decode and a dismissed picker look the same.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelCause {
    /// The user dismissed the picker or nothing was selected.
    NoSelection,
    /// Items were selected but none could be decoded and re-encoded.
    ProcessingFailed(Vec<ItemFailure>),
    /// The launcher could not be started or reported an error.
    PlatformFailed(String),
}

/// The single terminal event of a request.
#[derive(Debug)]
pub enum PickOutcome {
    Available(ImageResult),
    Cancelled(CancelCause),
}

impl PickOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PickOutcome::Cancelled(_))
    }

    pub fn into_images(self) -> Option<ImageResult> {
        match self {
            PickOutcome::Available(images) => Some(images),
            PickOutcome::Cancelled(_) => None,
        }
    }
}

pub type CompletionCallback = Box<dyn FnOnce(PickOutcome)>;

/// The in-flight request held by a [`RequestCoordinator`](crate::coordinator::RequestCoordinator).
pub struct PickRequest {
    kind: PickKind,
    options: PickOptions,
    on_complete: CompletionCallback,
}

impl PickRequest {
    pub fn new(
        kind: PickKind,
        options: PickOptions,
        on_complete: impl FnOnce(PickOutcome) + 'static,
    ) -> Self {
        Self {
            kind,
            options,
            on_complete: Box::new(on_complete),
        }
    }

    /// Build a request from an availability / cancellation callback pair.
    pub fn with_callbacks(
        kind: PickKind,
        options: PickOptions,
        on_available: impl FnOnce(ImageResult) + 'static,
        on_cancelled: impl FnOnce() + 'static,
    ) -> Self {
        Self::new(kind, options, move |outcome| match outcome {
            PickOutcome::Available(images) => on_available(images),
            PickOutcome::Cancelled(_) => on_cancelled(),
        })
    }

    pub fn kind(&self) -> PickKind {
        self.kind
    }

    pub fn options(&self) -> PickOptions {
        self.options
    }

    pub(crate) fn resolve(self, outcome: PickOutcome) {
        (self.on_complete)(outcome)
    }
}

impl fmt::Debug for PickRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PickRequest")
            .field("kind", &self.kind)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
