//! wgpu-backed buffer sink.

use std::collections::HashMap;

use wgpu::util::DeviceExt;

use super::{
    BufferSink, IndexBufferDesc, IndexBufferHandle, SinkResult, VertexBufferDesc,
    VertexBufferHandle,
};

/// Buffer sink backed by a wgpu device.
///
/// Buffers live inside the sink; handles map back to them through
/// [`WgpuBufferSink::vertex_buffer`] and [`WgpuBufferSink::index_buffer`].
/// Dropping the sink drops every buffer it created.
pub struct WgpuBufferSink {
    device: wgpu::Device,
    buffers: HashMap<u64, wgpu::Buffer>,
    next_buffer_id: u64,
}

impl WgpuBufferSink {
    pub fn new(device: wgpu::Device) -> Self {
        Self {
            device,
            buffers: HashMap::new(),
            next_buffer_id: 0,
        }
    }

    fn create_buffer(&mut self, label: Option<&str>, data: &[u8], usage: wgpu::BufferUsages) -> u64 {
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label,
                contents: data,
                usage,
            });
        let id = self.next_buffer_id;
        self.next_buffer_id += 1;
        self.buffers.insert(id, buffer);
        id
    }

    /// Look up the buffer behind a vertex handle.
    pub fn vertex_buffer(&self, handle: VertexBufferHandle) -> Option<&wgpu::Buffer> {
        self.buffers.get(&handle.id())
    }

    /// Look up the buffer behind an index handle.
    pub fn index_buffer(&self, handle: IndexBufferHandle) -> Option<&wgpu::Buffer> {
        self.buffers.get(&handle.id())
    }

    /// Number of live buffers.
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }
}

impl BufferSink for WgpuBufferSink {
    fn create_vertex_buffer(
        &mut self,
        desc: &VertexBufferDesc<'_>,
        data: &[u8],
    ) -> SinkResult<VertexBufferHandle> {
        log::debug!(
            "creating vertex buffer {:?}: {} vertices, stride {}, {} bytes",
            desc.label,
            desc.vertex_count,
            desc.layout.stride,
            data.len(),
        );
        let id = self.create_buffer(
            desc.label,
            data,
            wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        );
        Ok(VertexBufferHandle::new(id))
    }

    fn create_index_buffer(
        &mut self,
        desc: &IndexBufferDesc<'_>,
        data: &[u8],
    ) -> SinkResult<IndexBufferHandle> {
        log::debug!(
            "creating index buffer {:?}: {} indices ({:?})",
            desc.label,
            desc.index_count,
            desc.format,
        );
        let id = self.create_buffer(
            desc.label,
            data,
            wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        );
        Ok(IndexBufferHandle::new(id))
    }
}
