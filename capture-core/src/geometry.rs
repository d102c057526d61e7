/// Width and height in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A sub-rectangle of the sensor's pixel array, used as the scaler crop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rectangle {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rectangle {
    /// The `inner`-sized rectangle centered within `outer`.
    ///
    /// If `inner` exceeds `outer` on an axis the crop is pinned to the
    /// origin on that axis rather than wrapping.
    pub fn centered_within(outer: Size, inner: Size) -> Self {
        Self {
            x: outer.width.saturating_sub(inner.width) / 2,
            y: outer.height.saturating_sub(inner.height) / 2,
            width: inner.width,
            height: inner.height,
        }
    }
}

/// Geometry of the configured visible stream, fixed for the session's
/// lifetime once `open` succeeds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameGeometry {
    pub width: u32,
    pub height: u32,
    /// Bytes per row of the first plane, as reported by the device. May
    /// exceed `width` when the device pads rows for alignment.
    pub stride: u32,
}
