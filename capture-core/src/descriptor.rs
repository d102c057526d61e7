use std::os::fd::RawFd;

use crate::{Error, Result};

/// One physical memory segment of a hardware frame buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Plane {
    /// dmabuf file descriptor backing the plane.
    pub fd: RawFd,
    /// Byte offset of the plane within the descriptor.
    pub offset: u64,
    /// Plane length in bytes.
    pub length: u64,
}

/// A single contiguous memory region spanning all planes of a buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BufferDescriptor {
    pub fd: RawFd,
    pub offset: u64,
    pub length: u64,
}

/// Collapse a buffer's planes into one contiguous descriptor.
///
/// All planes must share one file descriptor and be laid out back-to-back
/// with no gaps. This holds for every allocator the session runs against
/// today; a violation means the environment no longer matches the
/// assumptions the descriptor model is built on, so the resulting
/// [`Error::ContiguityViolation`] is non-recoverable (`Error::is_fatal`).
pub fn contiguous_descriptor(planes: &[Plane]) -> Result<BufferDescriptor> {
    let Some(first) = planes.first() else {
        return Err(Error::ContiguityViolation("buffer has no planes".into()));
    };

    let mut desc = BufferDescriptor {
        fd: first.fd,
        offset: first.offset,
        length: first.length,
    };

    for plane in &planes[1..] {
        if plane.fd != desc.fd {
            return Err(Error::ContiguityViolation(
                format!("plane fd {} differs from fd {}", plane.fd, desc.fd).into(),
            ));
        }
        let end = desc.offset + desc.length;
        if plane.offset != end {
            return Err(Error::ContiguityViolation(
                format!("plane at offset {} does not start at {}", plane.offset, end).into(),
            ));
        }
        desc.length += plane.length;
    }

    Ok(desc)
}
