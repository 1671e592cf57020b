//! The picture chooser: request coordination, platform launch and image
//! processing wired together.
//!
//! ## Flow
//!
//! ```text
//! choose_* / take_picture / pick
//!   → RequestCoordinator::begin          (fails fast if a pick is pending)
//!   → PictureLauncher::launch            (platform UI, returns immediately)
//! ... user picks ...
//! handle_platform_result(PlatformResult)
//!   → per item: read → identify → compute_target_size → encode   (rayon)
//!   → RequestCoordinator::complete_*     (exactly one callback fires)
//! ```
//!
//! ## Failures
//!
//! Processing errors never surface as `Err` from these methods. They are
//! logged and turned into a cancellation:
//!
//! - single pick / capture: a failed item cancels the request;
//! - multi pick: failed items are omitted, and the request is cancelled only
//!   if none survive.
//!
//! Callbacks that only distinguish "available" from "cancelled" cannot tell a
//! failed decode from a dismissed picker. [`PictureChooser::pick`] exposes the
//! [`CancelCause`] for callers that want to.

use crate::coordinator::{CoordinatorError, RequestCoordinator};
use crate::imaging::{DimensionError, ImageCodec, ProcessError, resize_for_pick};
use crate::launcher::{PictureLauncher, PlatformResult, SelectedItem};
use crate::request::{
    CancelCause, ImageResult, ItemFailure, PickKind, PickOptions, PickOutcome, PickRequest,
    PickedImage,
};
use log::{error, trace, warn};
use rayon::prelude::*;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::oneshot;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChooserError {
    #[error(transparent)]
    InvalidArgument(#[from] DimensionError),
    #[error(transparent)]
    Coordinator(#[from] CoordinatorError),
}

#[derive(Error, Debug)]
enum ItemError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Process(#[from] ProcessError),
}

/// Future returned by the async-style operations.
///
/// Resolves to `None` when the request is cancelled for any reason, or if the
/// chooser is dropped before the request completes.
#[derive(Debug)]
pub struct PendingPick<T> {
    rx: oneshot::Receiver<Option<T>>,
}

impl<T> Future for PendingPick<T> {
    type Output = Option<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|r| r.ok().flatten())
    }
}

pub struct PictureChooser<L, C> {
    coordinator: RequestCoordinator,
    launcher: L,
    codec: C,
}

fn first_or_cancel(
    on_available: impl FnOnce(PickedImage) + 'static,
    on_cancelled: impl FnOnce() + 'static,
) -> impl FnOnce(PickOutcome) + 'static {
    move |outcome| match outcome.into_images().and_then(|i| i.into_iter().next()) {
        Some(image) => on_available(image),
        None => on_cancelled(),
    }
}

fn process_item(
    codec: &impl ImageCodec,
    item: &SelectedItem,
    options: PickOptions,
) -> Result<PickedImage, ItemError> {
    let data = item.read()?;
    let encoded = resize_for_pick(codec, &data, options.max_pixel_dimension(), options.quality())?;
    Ok(PickedImage::new(item.display_name(), encoded))
}

impl<L: PictureLauncher, C: ImageCodec> PictureChooser<L, C> {
    pub fn new(launcher: L, codec: C) -> Self {
        Self {
            coordinator: RequestCoordinator::new(),
            launcher,
            codec,
        }
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn is_pending(&self) -> bool {
        self.coordinator.is_pending()
    }

    fn start(&self, request: PickRequest) -> Result<(), ChooserError> {
        let kind = request.kind();
        self.coordinator.begin(request)?;
        if let Err(e) = self.launcher.launch(kind) {
            error!("Failed to launch {kind}: {e}");
            self.coordinator
                .complete_with_failure(CancelCause::PlatformFailed(e.to_string()));
        }
        Ok(())
    }

    /// Start a request of `kind`, reporting its outcome to `on_complete`.
    pub fn pick(
        &self,
        kind: PickKind,
        options: PickOptions,
        on_complete: impl FnOnce(PickOutcome) + 'static,
    ) -> Result<(), ChooserError> {
        self.start(PickRequest::new(kind, options, on_complete))
    }

    /// Let the user choose one picture from the library.
    pub fn choose_picture_from_library(
        &self,
        max_pixel_dimension: i64,
        percent_quality: u32,
        on_available: impl FnOnce(PickedImage) + 'static,
        on_cancelled: impl FnOnce() + 'static,
    ) -> Result<(), ChooserError> {
        let options = PickOptions::new(max_pixel_dimension, percent_quality)?;
        self.pick(
            PickKind::PickSingle,
            options,
            first_or_cancel(on_available, on_cancelled),
        )
    }

    /// Let the user choose any number of pictures from the library.
    pub fn choose_pictures_from_library(
        &self,
        max_pixel_dimension: i64,
        percent_quality: u32,
        on_available: impl FnOnce(ImageResult) + 'static,
        on_cancelled: impl FnOnce() + 'static,
    ) -> Result<(), ChooserError> {
        let options = PickOptions::new(max_pixel_dimension, percent_quality)?;
        self.start(PickRequest::with_callbacks(
            PickKind::PickMultiple,
            options,
            on_available,
            on_cancelled,
        ))
    }

    /// Let the user take a picture with the camera.
    pub fn take_picture(
        &self,
        max_pixel_dimension: i64,
        percent_quality: u32,
        on_available: impl FnOnce(PickedImage) + 'static,
        on_cancelled: impl FnOnce() + 'static,
    ) -> Result<(), ChooserError> {
        let options = PickOptions::new(max_pixel_dimension, percent_quality)?;
        self.pick(
            PickKind::Capture,
            options,
            first_or_cancel(on_available, on_cancelled),
        )
    }

    fn pick_future<T: 'static>(
        &self,
        kind: PickKind,
        max_pixel_dimension: i64,
        percent_quality: u32,
        extract: impl FnOnce(ImageResult) -> Option<T> + 'static,
    ) -> Result<PendingPick<T>, ChooserError> {
        let options = PickOptions::new(max_pixel_dimension, percent_quality)?;
        let (tx, rx) = oneshot::channel();
        self.pick(kind, options, move |outcome| {
            // The receiver may already be gone; nobody is waiting then.
            let _ = tx.send(outcome.into_images().and_then(extract));
        })?;
        Ok(PendingPick { rx })
    }

    /// [`choose_picture_from_library`](Self::choose_picture_from_library) as a future.
    pub fn choose_picture(
        &self,
        max_pixel_dimension: i64,
        percent_quality: u32,
    ) -> Result<PendingPick<PickedImage>, ChooserError> {
        self.pick_future(
            PickKind::PickSingle,
            max_pixel_dimension,
            percent_quality,
            |images| images.into_iter().next(),
        )
    }

    /// [`choose_pictures_from_library`](Self::choose_pictures_from_library) as a future.
    pub fn choose_pictures(
        &self,
        max_pixel_dimension: i64,
        percent_quality: u32,
    ) -> Result<PendingPick<ImageResult>, ChooserError> {
        self.pick_future(
            PickKind::PickMultiple,
            max_pixel_dimension,
            percent_quality,
            Some,
        )
    }

    /// [`take_picture`](Self::take_picture) as a future.
    pub fn capture_picture(
        &self,
        max_pixel_dimension: i64,
        percent_quality: u32,
    ) -> Result<PendingPick<PickedImage>, ChooserError> {
        self.pick_future(
            PickKind::Capture,
            max_pixel_dimension,
            percent_quality,
            |images| images.into_iter().next(),
        )
    }

    /// Entry point for the platform: resolve the pending request from a raw result.
    ///
    /// Results arriving while nothing is pending are logged and ignored.
    pub fn handle_platform_result(&self, result: PlatformResult) {
        let (Some(kind), Some(options)) = (
            self.coordinator.pending_kind(),
            self.coordinator.pending_options(),
        ) else {
            warn!("Platform result received but no request is pending; ignoring");
            return;
        };

        match result {
            PlatformResult::Cancelled => {
                trace!("Platform reported no selection for {kind}");
                self.coordinator.complete_with_cancellation();
            }
            PlatformResult::Failed(reason) => {
                error!("Platform failed for {kind}: {reason}");
                self.coordinator
                    .complete_with_failure(CancelCause::PlatformFailed(reason));
            }
            PlatformResult::Selected(mut items) => {
                if !kind.allows_multiple() && items.len() > 1 {
                    warn!(
                        "{kind} received {} items; using the first",
                        items.len()
                    );
                    items.truncate(1);
                }
                let (images, failures) = self.process_items(&items, options);
                if images.is_empty() && !failures.is_empty() {
                    self.coordinator
                        .complete_with_failure(CancelCause::ProcessingFailed(failures));
                } else {
                    if !failures.is_empty() {
                        warn!("Omitted {} of {} picked items", failures.len(), items.len());
                    }
                    self.coordinator.complete_with_result(images);
                }
            }
        }
    }

    /// Process every item, in parallel, keeping selection order.
    fn process_items(
        &self,
        items: &[SelectedItem],
        options: PickOptions,
    ) -> (ImageResult, Vec<ItemFailure>) {
        let codec = &self.codec;
        let results: Vec<Result<PickedImage, ItemError>> = items
            .par_iter()
            .map(|item| process_item(codec, item, options))
            .collect();

        let mut images = Vec::with_capacity(items.len());
        let mut failures = Vec::new();
        for (item, result) in items.iter().zip(results) {
            match result {
                Ok(image) => {
                    trace!(
                        "Processed {} → {}x{}",
                        item.location, image.width, image.height
                    );
                    images.push(image);
                }
                Err(e) => {
                    error!("Failed to process {}: {e}", item.location);
                    failures.push(ItemFailure {
                        item: item.location.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
        (images, failures)
    }
}
