//! Buffer-backed capture request pool.
//!
//! One request per allocated buffer, bound permanently by index; the
//! index doubles as the request cookie that comes back with completions.

use log::debug;

use capture_core::{contiguous_descriptor, BufferDescriptor, Error, Result};

use crate::stack::{
    CameraDevice, CaptureRequest, FrameAllocator, FrameBuffer, ReuseFlags, StreamId,
};

pub(crate) struct RequestPool<R> {
    requests: Vec<R>,
}

impl<R: CaptureRequest> RequestPool<R> {
    /// Allocate buffers for `stream` and build one request per buffer.
    ///
    /// A failure at any index frees the allocated buffers before
    /// returning; no partial pool is left live. The caller still owns the
    /// device acquisition and unwinds it.
    pub fn build<D>(device: &mut D, allocator: &mut D::Allocator, stream: StreamId) -> Result<Self>
    where
        D: CameraDevice<Request = R>,
        R: CaptureRequest<Buffer = <D::Allocator as FrameAllocator>::Buffer>,
    {
        let count = allocator
            .allocate(stream)
            .map_err(|e| Error::AllocationFailed(e.0))?;
        debug!("allocated {count} buffer(s) for stream {stream:?}");

        let mut requests = Vec::with_capacity(count);
        for index in 0..count {
            let Some(mut request) = device.create_request(index as u64) else {
                allocator.free(stream);
                return Err(Error::PoolBuildFailed(
                    format!("request creation failed at index {index}").into(),
                ));
            };
            let buffer = &allocator.buffers(stream)[index];
            if let Err(e) = request.add_buffer(stream, buffer) {
                allocator.free(stream);
                return Err(Error::PoolBuildFailed(e.0));
            }
            requests.push(request);
        }

        Ok(Self { requests })
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Extract the contiguous descriptor of the buffer at `index`.
    pub fn descriptor_at<A>(
        &self,
        allocator: &A,
        stream: StreamId,
        index: usize,
    ) -> Result<BufferDescriptor>
    where
        A: FrameAllocator,
    {
        let buffers = allocator.buffers(stream);
        let buffer = buffers.get(index).ok_or(Error::OutOfRange {
            index,
            count: buffers.len(),
        })?;
        contiguous_descriptor(buffer.planes())
    }

    /// Submit every request once, without a reuse cycle. Used for the
    /// initial submission right after device start; any failure aborts
    /// immediately and the remaining requests stay unqueued.
    pub fn queue_all<D>(&mut self, device: &mut D) -> Result<()>
    where
        D: CameraDevice<Request = R>,
    {
        for request in &mut self.requests {
            device
                .queue_request(request)
                .map_err(|e| Error::StartFailed(e.0))?;
        }
        Ok(())
    }

    /// Recycle the request at `index` and resubmit it to the device.
    pub fn queue<D>(&mut self, device: &mut D, index: usize) -> Result<()>
    where
        D: CameraDevice<Request = R>,
    {
        let count = self.requests.len();
        let request = self
            .requests
            .get_mut(index)
            .ok_or(Error::OutOfRange { index, count })?;
        request.reuse(ReuseFlags::BUFFERS);
        device
            .queue_request(request)
            .map_err(|e| Error::QueueFailed(e.0))
    }

    /// Drop all requests. Called during teardown after the device has
    /// stopped and before the allocator frees the buffers they reference.
    pub fn clear(&mut self) {
        self.requests.clear();
    }
}
