use std::fmt;

/// A pixel format identified by its V4L2/DRM fourcc code.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelFormat(pub u32);

impl PixelFormat {
    pub const fn new(fourcc: [u8; 4]) -> Self {
        Self(u32::from_le_bytes(fourcc))
    }

    pub const fn fourcc(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PixelFormat({})", self)
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0.to_le_bytes() {
            if byte.is_ascii_graphic() {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, ".")?;
            }
        }
        Ok(())
    }
}

/// Planar YUV 4:2:0, the fixed format of the visible stream.
pub const YUV420: PixelFormat = PixelFormat::new(*b"YU12");

/// 8-bit Bayer BGGR, used for the unbuffered raw forcing stream. Any
/// supported raw format would do; only the stream's presence matters.
pub const SBGGR8: PixelFormat = PixelFormat::new(*b"BA81");

/// Color space tag attached to a stream configuration entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorSpace {
    #[default]
    Unknown,
    Srgb,
    Smpte170m,
    /// No color space processing; raw sensor data.
    Raw,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fourcc_codes() {
        assert_eq!(YUV420.fourcc(), 0x3231_5559);
        assert_eq!(SBGGR8.fourcc(), 0x3138_4142);
    }

    #[test]
    fn display_prints_fourcc() {
        assert_eq!(YUV420.to_string(), "YU12");
        assert_eq!(PixelFormat(0x0000_0041).to_string(), "A...");
    }
}
