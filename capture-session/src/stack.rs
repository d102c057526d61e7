//! Capability seam for the external camera stack.
//!
//! The session never talks to camera hardware directly; it drives the
//! trait family below, which a production backend implements on top of
//! the platform camera stack and tests implement with an in-memory mock.
//! The surface is the fixed capability set the session actually calls:
//! manager start/stop, device enumeration and acquisition, dual-stream
//! configuration, buffer allocation, request submission and a single
//! completion event handler.

use std::borrow::Cow;

use bitflags::bitflags;
use thiserror::Error;

use capture_core::{ColorSpace, PixelFormat, Plane, Size};

use crate::controls::ControlList;

/// Stack-assigned camera identifier.
pub type DeviceId = String;

/// Opaque handle to a configured stream, assigned by the device when a
/// configuration is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StreamId(pub usize);

/// Error reported by the underlying camera stack. The session maps these
/// into the `capture_core::Error` taxonomy at each call site.
#[derive(Clone, Debug, Error)]
#[error("camera stack: {0}")]
pub struct StackError(pub Cow<'static, str>);

impl StackError {
    pub fn new(msg: impl Into<Cow<'static, str>>) -> Self {
        Self(msg.into())
    }
}

pub type StackResult<T> = std::result::Result<T, StackError>;

/// Role requested for a stream when generating a configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamRole {
    ViewFinder,
    VideoRecording,
    StillCapture,
    Raw,
}

/// Outcome of validating a camera configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigStatus {
    /// The configuration is usable as requested.
    Valid,
    /// The device adjusted one or more entries to make it usable.
    Adjusted,
    /// The configuration cannot be satisfied.
    Invalid,
}

/// Completion status of a capture request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestStatus {
    Pending,
    Complete,
    Cancelled,
}

bitflags! {
    /// What to retain when recycling a completed request for resubmission.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ReuseFlags: u32 {
        /// Keep the buffers bound to the request.
        const BUFFERS = 1;
    }
}

/// Snapshot of a completed request as delivered by the stack's completion
/// event: the pool cookie and the final status. The session only ever
/// reads these two fields, so the event carries them by value and the
/// stack's own request object never crosses the seam.
#[derive(Clone, Copy, Debug)]
pub struct CompletedRequest {
    pub cookie: u64,
    pub status: RequestStatus,
}

/// Handler invoked by the stack for every completed request. Runs on a
/// thread owned by the stack, never on the caller's thread.
pub type CompletionHandler = Box<dyn Fn(CompletedRequest) + Send + Sync>;

/// One mutable stream entry within a generated configuration.
pub trait StreamConfig {
    fn size(&self) -> Size;
    fn set_size(&mut self, size: Size);
    fn pixel_format(&self) -> PixelFormat;
    fn set_pixel_format(&mut self, format: PixelFormat);
    fn set_buffer_count(&mut self, count: u32);
    fn set_color_space(&mut self, color_space: ColorSpace);
    /// Bytes per row, populated by the device during validation.
    fn stride(&self) -> u32;
    /// The configured stream handle; `None` until the configuration has
    /// been applied to the device.
    fn stream(&self) -> Option<StreamId>;
}

/// A device-generated set of stream configuration entries.
pub trait CameraConfig {
    type Entry: StreamConfig;

    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn entry(&self, index: usize) -> Option<&Self::Entry>;
    fn entry_mut(&mut self, index: usize) -> Option<&mut Self::Entry>;
    /// Validate the combined configuration, adjusting entries in place if
    /// the device needs to.
    fn validate(&mut self) -> ConfigStatus;
}

/// A hardware frame buffer owned by the allocator.
pub trait FrameBuffer {
    fn planes(&self) -> &[Plane];
}

/// Allocates and owns the hardware buffers for a configured stream.
pub trait FrameAllocator {
    type Buffer: FrameBuffer;

    /// Allocate buffers for `stream`, returning how many were allocated.
    fn allocate(&mut self, stream: StreamId) -> StackResult<usize>;
    fn buffers(&self, stream: StreamId) -> &[Self::Buffer];
    fn free(&mut self, stream: StreamId);
}

/// A reusable capture submission unit bound to one buffer.
pub trait CaptureRequest {
    type Buffer: FrameBuffer;

    fn cookie(&self) -> u64;
    fn status(&self) -> RequestStatus;
    fn add_buffer(&mut self, stream: StreamId, buffer: &Self::Buffer) -> StackResult<()>;
    /// Recycle a completed request so it can be queued again.
    fn reuse(&mut self, flags: ReuseFlags);
}

/// An enumerated camera device.
pub trait CameraDevice {
    type Config: CameraConfig;
    type Allocator: FrameAllocator;
    type Request: CaptureRequest<Buffer = <Self::Allocator as FrameAllocator>::Buffer>;

    fn acquire(&mut self) -> StackResult<()>;
    fn release(&mut self);
    fn generate_configuration(&mut self, roles: &[StreamRole]) -> Option<Self::Config>;
    fn configure(&mut self, config: &mut Self::Config) -> StackResult<()>;
    /// Full native sensor size, when the device exposes it.
    fn pixel_array_size(&self) -> Option<Size>;
    fn new_allocator(&mut self) -> Self::Allocator;
    fn create_request(&mut self, cookie: u64) -> Option<Self::Request>;
    fn queue_request(&mut self, request: &mut Self::Request) -> StackResult<()>;
    fn start(&mut self, controls: &ControlList) -> StackResult<()>;
    fn stop(&mut self);
    /// Register the single completion handler. The stack invokes it from
    /// its own thread for every request it finishes.
    fn on_request_completed(&mut self, handler: CompletionHandler);
}

/// The camera stack manager: lifecycle and device enumeration.
pub trait CameraStack {
    type Device: CameraDevice;

    fn start(&mut self) -> StackResult<()>;
    fn stop(&mut self);
    fn devices(&mut self) -> Vec<DeviceId>;
    fn get(&mut self, id: &DeviceId) -> Option<Self::Device>;
}
