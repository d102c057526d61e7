use std::borrow::Cow;

use thiserror::Error;

use crate::format::PixelFormat;

/// Errors surfaced by the capture session layer.
///
/// Failures during `open`/`start` always leave the session fully unwound;
/// see the session documentation for the exact ordering guarantees.
#[derive(Clone, Debug, Error)]
pub enum Error {
    /// The camera stack failed to start, or it enumerated no devices.
    #[error("no camera device available: {0}")]
    DeviceUnavailable(Cow<'static, str>),
    /// Exclusive access to the camera device could not be obtained.
    #[error("acquire failed: {0}")]
    AcquireFailed(Cow<'static, str>),
    /// The device yielded no configuration candidate for the requested
    /// stream roles, or the negotiated configuration did not validate.
    #[error("configuration unsupported: {0}")]
    ConfigUnsupported(Cow<'static, str>),
    /// The device silently substituted a different pixel format for the
    /// visible stream. Format substitution is never auto-corrected.
    #[error("pixel format rejected, device substituted {0}")]
    FormatRejected(PixelFormat),
    /// Applying the validated configuration to the device failed.
    #[error("configure failed: {0}")]
    ConfigureFailed(Cow<'static, str>),
    /// The allocator could not provide buffers for the visible stream.
    #[error("buffer allocation failed: {0}")]
    AllocationFailed(Cow<'static, str>),
    /// Request creation or buffer binding failed while building the pool.
    #[error("request pool build failed: {0}")]
    PoolBuildFailed(Cow<'static, str>),
    /// Device start or the initial request submission failed.
    #[error("start failed: {0}")]
    StartFailed(Cow<'static, str>),
    /// A per-request submission was rejected by the device.
    #[error("queue failed: {0}")]
    QueueFailed(Cow<'static, str>),
    /// A request index outside the pool was supplied.
    #[error("request index {index} out of range for pool of {count}")]
    OutOfRange { index: usize, count: usize },
    /// The physical planes of a buffer are not laid out back-to-back in a
    /// single file descriptor. This breaks the memory-layout assumption
    /// the whole descriptor model rests on; the session cannot continue
    /// to reason about buffer memory and must be torn down.
    #[error("buffer planes not contiguous: {0}")]
    ContiguityViolation(Cow<'static, str>),
    /// An operation was attempted from the wrong session state, such as
    /// opening a session that is already open.
    #[error("invalid session state: {0}")]
    InvalidState(Cow<'static, str>),
}

impl Error {
    /// Stable string code for error classification.
    pub fn code(&self) -> &'static str {
        match self {
            Error::DeviceUnavailable(_) => "device_unavailable",
            Error::AcquireFailed(_) => "acquire_failed",
            Error::ConfigUnsupported(_) => "config_unsupported",
            Error::FormatRejected(_) => "format_rejected",
            Error::ConfigureFailed(_) => "configure_failed",
            Error::AllocationFailed(_) => "allocation_failed",
            Error::PoolBuildFailed(_) => "pool_build_failed",
            Error::StartFailed(_) => "start_failed",
            Error::QueueFailed(_) => "queue_failed",
            Error::OutOfRange { .. } => "out_of_range",
            Error::ContiguityViolation(_) => "contiguity_violation",
            Error::InvalidState(_) => "invalid_state",
        }
    }

    /// Whether the error invalidates the environment rather than the call.
    ///
    /// A fatal error means a precondition the session relies on does not
    /// hold; retrying or reopening the session cannot help.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::ContiguityViolation(_))
    }
}
