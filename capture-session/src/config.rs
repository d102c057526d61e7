//! Dual-stream configuration negotiation.
//!
//! The session wants the centered (width, height) section of the full
//! sensor. The only way to get the stack to crop rather than scale is to
//! configure two streams: the visible stream at the requested size with
//! the session's fixed pixel format, and an unbuffered raw stream at the
//! full sensor size whose sole purpose is to pin the sensor readout.

use log::{debug, info};

use capture_core::{format, ColorSpace, Error, FrameGeometry, Result, Size};

use crate::stack::{CameraConfig, CameraDevice, ConfigStatus, StreamConfig, StreamId, StreamRole};

/// A configuration validated against and applied to the device.
pub(crate) struct NegotiatedConfig<C> {
    pub config: C,
    pub stream: StreamId,
    pub geometry: FrameGeometry,
}

/// Negotiate and apply the dual-stream configuration.
///
/// Does not release the device on failure; the caller owns the
/// acquisition and unwinds it.
pub(crate) fn negotiate<D: CameraDevice>(
    device: &mut D,
    width: u32,
    height: u32,
) -> Result<NegotiatedConfig<D::Config>> {
    let mut config = device
        .generate_configuration(&[StreamRole::ViewFinder, StreamRole::ViewFinder])
        .ok_or_else(|| Error::ConfigUnsupported("no configuration candidate".into()))?;
    if config.len() < 2 {
        return Err(Error::ConfigUnsupported(
            format!("device offered {} stream(s), need 2", config.len()).into(),
        ));
    }

    let sensor = device
        .pixel_array_size()
        .ok_or_else(|| Error::ConfigUnsupported("device reports no pixel array size".into()))?;

    let visible = config.entry_mut(0).expect("checked len above");
    visible.set_size(Size::new(width, height));
    visible.set_pixel_format(format::YUV420);
    // Smallest possible buffer depth, to minimize queuing latency.
    visible.set_buffer_count(1);

    let raw = config.entry_mut(1).expect("checked len above");
    raw.set_size(sensor);
    raw.set_pixel_format(format::SBGGR8);
    raw.set_color_space(ColorSpace::Raw);
    // Never read; zero buffers.
    raw.set_buffer_count(0);

    let status = config.validate();
    if status == ConfigStatus::Invalid {
        return Err(Error::ConfigUnsupported(
            "combined configuration did not validate".into(),
        ));
    }
    let negotiated_format = config.entry(0).expect("checked len above").pixel_format();
    if negotiated_format != format::YUV420 {
        // The device is free to adjust sizes, but a substituted pixel
        // format would hand the caller frames it cannot decode.
        return Err(Error::FormatRejected(negotiated_format));
    }
    debug!("configuration validated ({status:?}), format {negotiated_format}");
    config.validate();

    device
        .configure(&mut config)
        .map_err(|e| Error::ConfigureFailed(e.0))?;

    let visible = config.entry(0).expect("checked len above");
    let stream = visible
        .stream()
        .ok_or_else(|| Error::ConfigureFailed("no stream handle after configure".into()))?;
    let size = visible.size();
    let geometry = FrameGeometry {
        width: size.width,
        height: size.height,
        stride: visible.stride(),
    };
    info!(
        "configured visible stream {}x{} stride {} (sensor {}x{})",
        geometry.width, geometry.height, geometry.stride, sensor.width, sensor.height
    );

    Ok(NegotiatedConfig {
        config,
        stream,
        geometry,
    })
}
