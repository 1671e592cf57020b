//! Single-slot request coordination.
//!
//! A [`RequestCoordinator`] admits at most one outstanding pick at a time.
//! Admission control is the whole concurrency model: there is no queue, a
//! second [`begin`](RequestCoordinator::begin) while a request is pending is
//! a sequencing bug in the caller and fails with
//! [`CoordinatorError::RequestAlreadyPending`].
//!
//! ## Execution context
//!
//! The coordinator is deliberately `!Sync`. The platform must deliver the
//! terminal event of a request on the same context that started it (the UI
//! thread, an activity-result callback, an event loop). That is a requirement
//! on the platform adapter; nothing here marshals between threads.
//!
//! ## Re-entrancy
//!
//! The pending slot is emptied before the request's callback runs, and every
//! method takes `&self`, so a callback holding the coordinator (or the
//! chooser that owns it) may immediately start the next request.

use crate::request::{CancelCause, ImageResult, PickKind, PickOptions, PickOutcome, PickRequest};
use log::{trace, warn};
use std::cell::RefCell;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorError {
    #[error("cannot start a picture request while another one is still pending")]
    RequestAlreadyPending,
}

#[derive(Debug, Default)]
pub struct RequestCoordinator {
    pending: RefCell<Option<PickRequest>>,
}

impl RequestCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `request` as the pending request.
    pub fn begin(&self, request: PickRequest) -> Result<(), CoordinatorError> {
        let mut slot = self.pending.borrow_mut();
        if slot.is_some() {
            return Err(CoordinatorError::RequestAlreadyPending);
        }
        trace!("Request {} started", request.kind());
        *slot = Some(request);
        Ok(())
    }

    pub fn is_pending(&self) -> bool {
        self.pending.borrow().is_some()
    }

    pub fn pending_kind(&self) -> Option<PickKind> {
        self.pending.borrow().as_ref().map(PickRequest::kind)
    }

    pub fn pending_options(&self) -> Option<PickOptions> {
        self.pending.borrow().as_ref().map(PickRequest::options)
    }

    /// Empty the slot. The `RefCell` borrow ends here, before any callback runs.
    fn take(&self) -> Option<PickRequest> {
        self.pending.borrow_mut().take()
    }

    /// Deliver the pictures of the pending request.
    ///
    /// An empty result resolves the request as cancelled. Returns `false`
    /// when there was nothing pending (a spurious or duplicate platform
    /// callback), in which case nothing happens.
    pub fn complete_with_result(&self, images: ImageResult) -> bool {
        let Some(request) = self.take() else {
            warn!(
                "Result with {} image(s) received but no request is pending",
                images.len()
            );
            return false;
        };
        if images.is_empty() {
            trace!("Request {} resolved with no images", request.kind());
            request.resolve(PickOutcome::Cancelled(CancelCause::NoSelection));
        } else {
            trace!(
                "Request {} resolved with {} image(s)",
                request.kind(),
                images.len()
            );
            request.resolve(PickOutcome::Available(images));
        }
        true
    }

    /// Resolve the pending request as cancelled by the user.
    pub fn complete_with_cancellation(&self) -> bool {
        self.complete_with_failure(CancelCause::NoSelection)
    }

    /// Resolve the pending request as cancelled, carrying `cause`.
    pub fn complete_with_failure(&self, cause: CancelCause) -> bool {
        let Some(request) = self.take() else {
            trace!("Cancellation received but no request is pending");
            return false;
        };
        trace!("Request {} cancelled: {cause:?}", request.kind());
        request.resolve(PickOutcome::Cancelled(cause));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::{EncodedImage, TargetSize};
    use crate::request::PickedImage;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    fn options() -> PickOptions {
        PickOptions::new(1024, 90).unwrap()
    }

    fn image(name: &str) -> PickedImage {
        PickedImage::new(
            name,
            EncodedImage {
                data: name.as_bytes().to_vec(),
                size: TargetSize {
                    width: 1,
                    height: 1,
                },
            },
        )
    }

    /// Request whose callbacks append to `log`.
    fn recording_request(kind: PickKind, log: &Log) -> PickRequest {
        let (a, c) = (log.clone(), log.clone());
        PickRequest::with_callbacks(
            kind,
            options(),
            move |images| {
                let names: Vec<String> = images.into_iter().map(|i| i.name).collect();
                a.borrow_mut().push(format!("available {}", names.join(",")));
            },
            move || c.borrow_mut().push("cancelled".to_string()),
        )
    }

    #[test]
    fn second_begin_while_pending_fails() {
        let log = Log::default();
        let coordinator = RequestCoordinator::new();
        coordinator
            .begin(recording_request(PickKind::PickSingle, &log))
            .unwrap();
        let err = coordinator
            .begin(recording_request(PickKind::Capture, &log))
            .unwrap_err();
        assert_eq!(err, CoordinatorError::RequestAlreadyPending);
        // The first request is untouched
        assert_eq!(coordinator.pending_kind(), Some(PickKind::PickSingle));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn begin_succeeds_again_after_result() {
        let log = Log::default();
        let coordinator = RequestCoordinator::new();
        coordinator
            .begin(recording_request(PickKind::PickSingle, &log))
            .unwrap();
        assert!(coordinator.complete_with_result(vec![image("a")]));
        assert!(!coordinator.is_pending());
        coordinator
            .begin(recording_request(PickKind::PickSingle, &log))
            .unwrap();
    }

    #[test]
    fn begin_succeeds_again_after_cancellation() {
        let log = Log::default();
        let coordinator = RequestCoordinator::new();
        coordinator
            .begin(recording_request(PickKind::Capture, &log))
            .unwrap();
        assert!(coordinator.complete_with_cancellation());
        coordinator
            .begin(recording_request(PickKind::Capture, &log))
            .unwrap();
        assert_eq!(*log.borrow(), vec!["cancelled"]);
    }

    #[test]
    fn empty_result_invokes_cancelled_only() {
        let log = Log::default();
        let coordinator = RequestCoordinator::new();
        coordinator
            .begin(recording_request(PickKind::PickMultiple, &log))
            .unwrap();
        coordinator.complete_with_result(Vec::new());
        assert_eq!(*log.borrow(), vec!["cancelled"]);
    }

    #[test]
    fn result_invokes_available_once_with_items_in_order() {
        let log = Log::default();
        let coordinator = RequestCoordinator::new();
        coordinator
            .begin(recording_request(PickKind::PickMultiple, &log))
            .unwrap();
        coordinator.complete_with_result(vec![image("a"), image("b"), image("c")]);
        // A duplicate platform callback must not fire anything
        assert!(!coordinator.complete_with_result(vec![image("d")]));
        assert!(!coordinator.complete_with_cancellation());
        assert_eq!(*log.borrow(), vec!["available a,b,c"]);
    }

    #[test]
    fn completion_without_pending_is_noop() {
        let coordinator = RequestCoordinator::new();
        assert!(!coordinator.complete_with_result(vec![image("a")]));
        assert!(!coordinator.complete_with_cancellation());
        assert!(!coordinator.complete_with_failure(CancelCause::PlatformFailed("x".into())));
        assert!(!coordinator.is_pending());
    }

    #[test]
    fn failure_carries_cause_to_outcome_callback() {
        let seen = Rc::new(RefCell::new(None));
        let sink = seen.clone();
        let coordinator = RequestCoordinator::new();
        coordinator
            .begin(PickRequest::new(PickKind::PickSingle, options(), move |o| {
                *sink.borrow_mut() = Some(o)
            }))
            .unwrap();
        coordinator.complete_with_failure(CancelCause::PlatformFailed("camera busy".into()));
        match seen.borrow_mut().take() {
            Some(PickOutcome::Cancelled(CancelCause::PlatformFailed(reason))) => {
                assert_eq!(reason, "camera busy")
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn callback_observes_cleared_slot_and_can_begin_again() {
        let coordinator = Rc::new(RequestCoordinator::new());
        let log = Log::default();
        let (inner, inner_log) = (coordinator.clone(), log.clone());
        coordinator
            .begin(PickRequest::new(PickKind::PickSingle, options(), move |_| {
                inner_log
                    .borrow_mut()
                    .push(format!("pending during callback: {}", inner.is_pending()));
                inner
                    .begin(recording_request(PickKind::Capture, &inner_log))
                    .unwrap();
            }))
            .unwrap();

        coordinator.complete_with_result(vec![image("a")]);
        assert_eq!(coordinator.pending_kind(), Some(PickKind::Capture));

        coordinator.complete_with_cancellation();
        assert_eq!(
            *log.borrow(),
            vec!["pending during callback: false", "cancelled"]
        );
    }

    #[test]
    fn pending_options_are_exposed() {
        let coordinator = RequestCoordinator::new();
        assert_eq!(coordinator.pending_options(), None);
        coordinator
            .begin(PickRequest::new(PickKind::PickMultiple, options(), |_| {}))
            .unwrap();
        assert_eq!(coordinator.pending_options(), Some(options()));
    }
}
