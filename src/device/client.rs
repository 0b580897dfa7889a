//! GPU client: device/queue ownership and buffer management.
//!
//! `GpuClient` owns the wgpu device and queue for one pipeline run. All
//! transfers are blocking: a write-then-dispatch-then-read sequence completes
//! fully before its results are consumed, so the host and device never touch
//! the same buffer region across a write/read boundary.
//!
//! Output buffers are stage-scoped. A buffer may be reused across stages
//! only after it has been re-filled with the next stage's neutral element;
//! reuse without re-initialization is a correctness bug.

use std::sync::Arc;
use std::time::Duration;
use wgpu::{Adapter, Buffer, BufferDescriptor, BufferUsages, Device, Queue};

use super::adapter::select_adapter;
use super::shaders::PipelineCache;
use crate::error::{Error, Result};

/// Timeout for blocking device polls.
const POLL_TIMEOUT: Duration = Duration::from_secs(60);

/// GPU runtime client.
///
/// Owns the wgpu device and queue; all kernel dispatches and transfers for a
/// pipeline run go through one client, so device work is serialized on a
/// single ordered queue.
#[derive(Clone)]
pub struct GpuClient {
    adapter_name: String,
    backend: wgpu::Backend,
    device: Arc<Device>,
    queue: Arc<Queue>,
    pipeline_cache: Arc<PipelineCache>,
}

impl std::fmt::Debug for GpuClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpuClient")
            .field("adapter", &self.adapter_name)
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

impl GpuClient {
    /// Create a client for a platform/device index pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the selection is out of range or the device
    /// request fails.
    pub fn new(platform: usize, device_index: usize) -> Result<Self> {
        let adapter = select_adapter(platform, device_index)?;
        Self::from_adapter(adapter)
    }

    /// Create a client from an already-selected adapter.
    pub fn from_adapter(adapter: Adapter) -> Result<Self> {
        let info = adapter.get_info();

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("tempr device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
            experimental_features: wgpu::ExperimentalFeatures::default(),
        }))
        .map_err(|e| Error::Device(format!("{e:?}")))?;

        let device = Arc::new(device);
        let queue = Arc::new(queue);
        let pipeline_cache = Arc::new(PipelineCache::new(device.clone()));

        tracing::info!(adapter = %info.name, backend = ?info.backend, "GPU client ready");

        Ok(Self {
            adapter_name: info.name,
            backend: info.backend,
            device,
            queue,
            pipeline_cache,
        })
    }

    /// Adapter name of the selected device.
    #[inline]
    pub fn adapter_name(&self) -> &str {
        &self.adapter_name
    }

    /// Backend (Vulkan, Metal, DX12, GL) of the selected device.
    #[inline]
    pub fn backend(&self) -> wgpu::Backend {
        self.backend
    }

    /// Get reference to the wgpu device.
    #[inline]
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Get reference to the wgpu queue.
    #[inline]
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// Get reference to the pipeline cache.
    #[inline]
    pub fn pipeline_cache(&self) -> &PipelineCache {
        &self.pipeline_cache
    }

    /// Create a storage buffer for kernel input/output data.
    pub fn create_storage_buffer(&self, label: &str, size: u64) -> Buffer {
        self.device.create_buffer(&BufferDescriptor {
            label: Some(label),
            size,
            usage: BufferUsages::STORAGE | BufferUsages::COPY_DST | BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        })
    }

    /// Create a staging buffer for CPU readback.
    pub fn create_staging_buffer(&self, label: &str, size: u64) -> Buffer {
        self.device.create_buffer(&BufferDescriptor {
            label: Some(label),
            size,
            usage: BufferUsages::MAP_READ | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Create a uniform buffer holding one Pod parameter struct.
    pub fn create_params_buffer<T: bytemuck::Pod>(&self, label: &str, params: &T) -> Buffer {
        let buffer = self.device.create_buffer(&BufferDescriptor {
            label: Some(label),
            size: std::mem::size_of::<T>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        self.queue.write_buffer(&buffer, 0, bytemuck::bytes_of(params));
        buffer
    }

    /// Write data to a buffer.
    pub fn write_buffer<T: bytemuck::Pod>(&self, buffer: &Buffer, data: &[T]) {
        self.queue.write_buffer(buffer, 0, bytemuck::cast_slice(data));
    }

    /// Fill `count` elements of a buffer with one `i32` value.
    ///
    /// Used to pre-initialize every reduction output with the operation's
    /// neutral element before dispatch, so a kernel that only partially
    /// writes its output still yields the correct result.
    pub fn fill_i32(&self, buffer: &Buffer, value: i32, count: usize) {
        let fill = vec![value; count];
        self.write_buffer(buffer, &fill);
    }

    /// Submit commands and block until the device has executed them.
    pub fn submit_and_wait(&self, encoder: wgpu::CommandEncoder) -> Result<()> {
        let submission = self.queue.submit(std::iter::once(encoder.finish()));
        self.device
            .poll(wgpu::PollType::Wait {
                submission_index: Some(submission),
                timeout: Some(POLL_TIMEOUT),
            })
            .map_err(|e| Error::Backend(format!("GPU poll failed after submit: {e}")))?;
        Ok(())
    }

    /// Read `count` elements back from a storage buffer (blocking).
    ///
    /// Copies through a staging buffer and maps it; returns only after the
    /// device has fully completed all prior work on the queue.
    pub fn read_buffer<T: bytemuck::Pod>(&self, storage: &Buffer, count: usize) -> Result<Vec<T>> {
        let size = (count * std::mem::size_of::<T>()) as u64;
        let staging = self.create_staging_buffer("readback staging", size);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("readback"),
            });
        encoder.copy_buffer_to_buffer(storage, 0, &staging, 0, size);
        self.submit_and_wait(encoder)?;

        let slice = staging.slice(..);
        let (sender, receiver) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });

        self.device
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: Some(POLL_TIMEOUT),
            })
            .map_err(|e| Error::Backend(format!("GPU poll failed during readback: {e}")))?;

        let map_result = receiver.recv().map_err(|_| {
            Error::Backend("map_async callback was not invoked during readback".into())
        })?;
        map_result.map_err(|e| Error::Backend(format!("map_async failed during readback: {e}")))?;

        let output = {
            let data = slice.get_mapped_range();
            let src: &[T] = bytemuck::cast_slice(&data);
            src[..count].to_vec()
        };

        staging.unmap();
        Ok(output)
    }
}
