//! Single-camera capture session management over an external camera
//! stack.
//!
//! The session negotiates a dual-stream configuration that yields a
//! cropped, centered section of the sensor at a caller-chosen resolution
//! (one buffered visible stream plus one unbuffered raw stream that pins
//! the sensor readout), owns the resulting buffers and capture requests,
//! and bridges the stack's asynchronous completion event back to the
//! caller as `(token, cookie)` frame notifications.
//!
//! The camera stack itself is a collaborator behind the [`stack`] trait
//! family; production code implements it over the platform stack, tests
//! drive the session with an in-memory mock.
//!
//! ```rust,ignore
//! use capture_session::{frame_channel, CaptureSession, SessionToken};
//!
//! let (notify, frames) = frame_channel();
//! let mut session = CaptureSession::new(stack, notify);
//! session.open(1920, 1080, SessionToken(1))?;
//!
//! let format = session.frame_format()?;
//! for i in 0..session.buffer_count() {
//!     let desc = session.buffer_descriptor_at(i)?;
//!     share_with_consumer(desc, format);
//! }
//!
//! session.start(1920, 1080)?;
//! while let Ok(ready) = frames.recv() {
//!     consume_frame(ready.cookie);
//!     session.queue_request(ready.cookie as usize)?;
//! }
//! session.close()?;
//! ```

mod bridge;
mod config;
mod pool;
mod session;

pub mod controls;
pub mod stack;

pub use bridge::{frame_channel, FrameReady, FrameReadyHandler, SessionToken};
pub use session::CaptureSession;

pub use capture_core::{BufferDescriptor, Error, FrameGeometry, Plane, Result};
