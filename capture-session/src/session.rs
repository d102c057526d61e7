//! The capture session state machine.

use log::{info, warn};

use capture_core::{BufferDescriptor, Error, FrameGeometry, Rectangle, Result, Size};

use crate::bridge::{completion_bridge, FrameReadyHandler, SessionToken};
use crate::config::negotiate;
use crate::controls::{ControlId, ControlList, ControlValue};
use crate::pool::RequestPool;
use crate::stack::{
    CameraConfig, CameraDevice, CameraStack, FrameAllocator, StreamConfig, StreamId,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SessionState {
    Closed,
    Ready,
    Running,
}

/// A single-camera capture session.
///
/// The session owns the camera stack handle, the acquired device, its
/// buffer allocator and the request pool for its whole open lifetime, and
/// releases them in strict reverse acquisition order on [`close`].
///
/// `open`, `start`, `queue_request` and `close` are synchronous blocking
/// calls with no internal locking. Frame completions are delivered on a
/// stack-owned thread through the handler given to [`new`]; the caller is
/// expected to serialize its own calls and to call `queue_request` only
/// in response to a received completion. Use [`crate::frame_channel`] to
/// move completion handling onto the caller's own thread.
///
/// Only the first enumerated camera is used; device selection is not
/// supported.
///
/// [`new`]: CaptureSession::new
/// [`close`]: CaptureSession::close
pub struct CaptureSession<S: CameraStack> {
    stack: S,
    notify: FrameReadyHandler,
    state: SessionState,
    active: Option<Active<S::Device>>,
}

struct Active<D: CameraDevice> {
    device: D,
    config: D::Config,
    allocator: D::Allocator,
    pool: RequestPool<D::Request>,
    stream: StreamId,
}

impl<S: CameraStack> CaptureSession<S> {
    /// Create a closed session over `stack`. `notify` receives a
    /// [`crate::FrameReady`] for every completed, non-cancelled request;
    /// it is invoked from a stack-owned thread.
    pub fn new(stack: S, notify: FrameReadyHandler) -> Self {
        Self {
            stack,
            notify,
            state: SessionState::Closed,
            active: None,
        }
    }

    /// Open the session: start the stack, acquire the first enumerated
    /// device, negotiate the dual-stream configuration, build the buffer
    /// and request pool and register the completion bridge with `token`.
    ///
    /// On any failure everything acquired so far is released, in reverse
    /// order, before the error is returned; a failed `open` leaves no
    /// partial session behind.
    pub fn open(&mut self, width: u32, height: u32, token: SessionToken) -> Result<()> {
        if self.state != SessionState::Closed {
            return Err(Error::InvalidState("session already open".into()));
        }

        self.stack
            .start()
            .map_err(|e| Error::DeviceUnavailable(e.0))?;

        let Some(id) = self.stack.devices().into_iter().next() else {
            self.stack.stop();
            return Err(Error::DeviceUnavailable(
                "no camera devices enumerated".into(),
            ));
        };
        let Some(mut device) = self.stack.get(&id) else {
            self.stack.stop();
            return Err(Error::DeviceUnavailable(
                format!("device {id} disappeared after enumeration").into(),
            ));
        };
        if let Err(e) = device.acquire() {
            self.stack.stop();
            return Err(Error::AcquireFailed(e.0));
        }

        let negotiated = match negotiate(&mut device, width, height) {
            Ok(negotiated) => negotiated,
            Err(e) => {
                device.release();
                self.stack.stop();
                return Err(e);
            }
        };

        let mut allocator = device.new_allocator();
        let pool = match RequestPool::build(&mut device, &mut allocator, negotiated.stream) {
            Ok(pool) => pool,
            Err(e) => {
                device.release();
                self.stack.stop();
                return Err(e);
            }
        };

        device.on_request_completed(completion_bridge(token, self.notify.clone()));

        info!(
            "session open on {id}: {} buffer(s), {:?}",
            pool.len(),
            negotiated.geometry
        );
        self.active = Some(Active {
            device,
            config: negotiated.config,
            allocator,
            pool,
            stream: negotiated.stream,
        });
        self.state = SessionState::Ready;
        Ok(())
    }

    /// Apply a centered (width, height) scaler crop, start the device and
    /// submit every pooled request once.
    ///
    /// A submission failure aborts immediately with the remaining
    /// requests unqueued; the caller must treat that as a fatal start
    /// failure and close the session.
    pub fn start(&mut self, width: u32, height: u32) -> Result<()> {
        if self.state != SessionState::Ready {
            return Err(Error::InvalidState("session not open or already running".into()));
        }
        let active = self.active.as_mut().expect("open state implies active");

        let requested = Size::new(width, height);
        let sensor = active.device.pixel_array_size().unwrap_or(requested);
        let crop = Rectangle::centered_within(sensor, requested);
        let mut controls = ControlList::new();
        controls.set(ControlId::ScalerCrop, ControlValue::Rectangle(crop));

        active
            .device
            .start(&controls)
            .map_err(|e| Error::StartFailed(e.0))?;
        if let Err(e) = active.pool.queue_all(&mut active.device) {
            warn!("initial request submission failed: {e}");
            return Err(e);
        }

        info!("capture running, crop {crop:?}");
        self.state = SessionState::Running;
        Ok(())
    }

    /// Recycle the completed request at `index` and resubmit it. Valid
    /// only while running; a device-level failure is surfaced as
    /// [`Error::QueueFailed`] with no rollback or retry.
    pub fn queue_request(&mut self, index: usize) -> Result<()> {
        if self.state != SessionState::Running {
            return Err(Error::InvalidState("session not running".into()));
        }
        let active = self.active.as_mut().expect("running state implies active");
        active.pool.queue(&mut active.device, index)
    }

    /// Geometry of the visible stream, fixed since `open`.
    pub fn frame_format(&self) -> Result<FrameGeometry> {
        let active = self.open_ref()?;
        let visible = active.config.entry(0).expect("validated during open");
        let size = visible.size();
        Ok(FrameGeometry {
            width: size.width,
            height: size.height,
            stride: visible.stride(),
        })
    }

    /// Number of buffers (and requests) in the pool; 0 when closed.
    pub fn buffer_count(&self) -> usize {
        self.active.as_ref().map_or(0, |active| active.pool.len())
    }

    /// The contiguous memory descriptor of the buffer at `index`.
    pub fn buffer_descriptor_at(&self, index: usize) -> Result<BufferDescriptor> {
        let active = self.open_ref()?;
        active
            .pool
            .descriptor_at(&active.allocator, active.stream, index)
    }

    /// Whether the session is currently capturing.
    pub fn running(&self) -> bool {
        self.state == SessionState::Running
    }

    /// Tear the session down: stop the device, drop the requests, free
    /// the buffers, release the device and stop the stack, in that order,
    /// unconditionally. Returns `InvalidState` when already closed.
    pub fn close(&mut self) -> Result<()> {
        if self.state == SessionState::Closed {
            return Err(Error::InvalidState("session already closed".into()));
        }
        let mut active = self.active.take().expect("open state implies active");

        active.device.stop();
        active.pool.clear();
        active.allocator.free(active.stream);
        active.device.release();
        self.stack.stop();

        self.state = SessionState::Closed;
        info!("session closed");
        Ok(())
    }

    fn open_ref(&self) -> Result<&Active<S::Device>> {
        self.active
            .as_ref()
            .ok_or_else(|| Error::InvalidState("session not open".into()))
    }
}
