//! Core types shared by the capture session layer: the error taxonomy,
//! frame geometry, pixel format tags and the buffer descriptor model.

pub mod descriptor;
pub mod error;
pub mod format;
pub mod geometry;

pub use descriptor::{contiguous_descriptor, BufferDescriptor, Plane};
pub use error::Error;
pub use format::{ColorSpace, PixelFormat};
pub use geometry::{FrameGeometry, Rectangle, Size};

pub type Result<T> = std::result::Result<T, Error>;
