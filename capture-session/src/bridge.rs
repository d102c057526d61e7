//! Bridges the stack's asynchronous completion event to the caller.
//!
//! Completions arrive on a thread owned by the camera stack, never on the
//! caller's thread. The bridge filters out cancelled requests (they
//! produced no frame and are torn down or re-queued by the session) and
//! forwards the session token plus the request cookie to the caller's
//! handler. Callers that prefer to poll from their own thread can use
//! [`frame_channel`] to adapt the handler to an mpsc receiver.

use std::sync::{mpsc, Arc};

use log::debug;

use crate::stack::{CompletionHandler, RequestStatus};

/// Opaque caller-supplied value echoed back with every frame notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionToken(pub u64);

/// Notification that the request identified by `cookie` completed with a
/// valid frame. Its buffer holds the frame until the request is queued
/// again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameReady {
    pub token: SessionToken,
    pub cookie: u64,
}

/// Caller-supplied notification target. Invoked on a stack-owned thread,
/// so it must be safe to call from an arbitrary thread.
pub type FrameReadyHandler = Arc<dyn Fn(FrameReady) + Send + Sync>;

/// Build the completion handler registered with the device.
pub(crate) fn completion_bridge(token: SessionToken, notify: FrameReadyHandler) -> CompletionHandler {
    Box::new(move |completed| {
        if completed.status == RequestStatus::Cancelled {
            debug!("dropping cancelled request {}", completed.cookie);
            return;
        }
        notify(FrameReady {
            token,
            cookie: completed.cookie,
        });
    })
}

/// A channel-backed notification target.
///
/// The returned handler forwards every notification into the channel; the
/// receiver belongs to the caller's thread, which keeps the caller's
/// frame handling off the stack's completion thread entirely.
pub fn frame_channel() -> (FrameReadyHandler, mpsc::Receiver<FrameReady>) {
    let (tx, rx) = mpsc::channel();
    let handler: FrameReadyHandler = Arc::new(move |ready| {
        // The receiver may be gone during teardown; late completions are
        // dropped, same as a cancelled request.
        let _ = tx.send(ready);
    });
    (handler, rx)
}
