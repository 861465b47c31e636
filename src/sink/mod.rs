//! GPU buffer sinks: where finished geometry gets handed off.
//!
//! The conversion pipeline never reaches into a rendering subsystem on its
//! own. Callers inject a [`BufferSink`] and get opaque handles back; the
//! sink owns the buffers and decides what a handle means.

mod wgpu_sink;

pub use wgpu_sink::WgpuBufferSink;

use thiserror::Error;

use crate::geometry::{IndexFormat, MeshGeometry, VertexLayout};

/// Errors a buffer sink can raise.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to create buffer: {0}")]
    BufferCreation(String),
}

pub type SinkResult<T> = Result<T, SinkError>;

/// Handle to a vertex buffer owned by a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexBufferHandle(u64);

impl VertexBufferHandle {
    /// Wrap a sink-assigned id.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// The sink-assigned id.
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Handle to an index buffer owned by a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexBufferHandle(u64);

impl IndexBufferHandle {
    /// Wrap a sink-assigned id.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// The sink-assigned id.
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Describes a vertex buffer being created.
#[derive(Debug)]
pub struct VertexBufferDesc<'a> {
    pub label: Option<&'a str>,
    pub layout: &'a VertexLayout,
    pub vertex_count: u32,
}

/// Describes an index buffer being created.
#[derive(Debug)]
pub struct IndexBufferDesc<'a> {
    pub label: Option<&'a str>,
    pub format: IndexFormat,
    pub index_count: u32,
}

/// Creates GPU-side buffers from finished geometry.
pub trait BufferSink {
    /// Create a vertex buffer holding `data`, laid out per the descriptor.
    fn create_vertex_buffer(
        &mut self,
        desc: &VertexBufferDesc<'_>,
        data: &[u8],
    ) -> SinkResult<VertexBufferHandle>;

    /// Create an index buffer holding `data` in the descriptor's format.
    fn create_index_buffer(
        &mut self,
        desc: &IndexBufferDesc<'_>,
        data: &[u8],
    ) -> SinkResult<IndexBufferHandle>;
}

/// Handles returned for one uploaded primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadedPrimitive {
    pub vertex_buffer: VertexBufferHandle,
    /// Absent for non-indexed primitives.
    pub index_buffer: Option<IndexBufferHandle>,
}

/// Push a converted mesh's buffers through a sink, primitive by primitive.
pub fn upload_mesh<S: BufferSink + ?Sized>(
    sink: &mut S,
    mesh: &MeshGeometry,
) -> SinkResult<Vec<UploadedPrimitive>> {
    let mut uploaded = Vec::with_capacity(mesh.primitives.len());
    for primitive in &mesh.primitives {
        let vertex_buffer = sink.create_vertex_buffer(
            &VertexBufferDesc {
                label: primitive.label.as_deref(),
                layout: &primitive.layout,
                vertex_count: primitive.vertex_count,
            },
            &primitive.vertex_data,
        )?;

        let index_buffer = match &primitive.indices {
            Some(indices) => Some(sink.create_index_buffer(
                &IndexBufferDesc {
                    label: primitive.label.as_deref(),
                    format: indices.format,
                    index_count: indices.count,
                },
                &indices.data,
            )?),
            None => None,
        };

        uploaded.push(UploadedPrimitive {
            vertex_buffer,
            index_buffer,
        });
    }
    Ok(uploaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{IndexData, PrimitiveGeometry, PrimitiveTopology};

    #[derive(Default)]
    struct CountingSink {
        vertex_buffers: Vec<(Option<String>, usize)>,
        index_buffers: Vec<(IndexFormat, usize)>,
        next_id: u64,
    }

    impl CountingSink {
        fn next(&mut self) -> u64 {
            let id = self.next_id;
            self.next_id += 1;
            id
        }
    }

    impl BufferSink for CountingSink {
        fn create_vertex_buffer(
            &mut self,
            desc: &VertexBufferDesc<'_>,
            data: &[u8],
        ) -> SinkResult<VertexBufferHandle> {
            self.vertex_buffers
                .push((desc.label.map(String::from), data.len()));
            let id = self.next();
            Ok(VertexBufferHandle::new(id))
        }

        fn create_index_buffer(
            &mut self,
            desc: &IndexBufferDesc<'_>,
            data: &[u8],
        ) -> SinkResult<IndexBufferHandle> {
            self.index_buffers.push((desc.format, data.len()));
            let id = self.next();
            Ok(IndexBufferHandle::new(id))
        }
    }

    fn primitive(label: &str, indexed: bool) -> PrimitiveGeometry {
        PrimitiveGeometry {
            label: Some(label.to_string()),
            topology: PrimitiveTopology::TriangleList,
            vertex_data: vec![0; 36],
            layout: VertexLayout::default(),
            vertex_count: 3,
            indices: indexed.then(|| IndexData {
                format: IndexFormat::Uint16,
                data: vec![0, 0, 1, 0, 2, 0],
                count: 3,
            }),
            assignments: Vec::new(),
        }
    }

    #[test]
    fn test_upload_mesh() {
        let mesh = MeshGeometry {
            name: Some("m".to_string()),
            primitives: vec![primitive("m_prim0", true), primitive("m_prim1", false)],
            bounds: None,
        };

        let mut sink = CountingSink::default();
        let uploaded = upload_mesh(&mut sink, &mesh).unwrap();

        assert_eq!(uploaded.len(), 2);
        assert!(uploaded[0].index_buffer.is_some());
        assert!(uploaded[1].index_buffer.is_none());
        assert_eq!(sink.vertex_buffers.len(), 2);
        assert_eq!(sink.vertex_buffers[0].0.as_deref(), Some("m_prim0"));
        assert_eq!(sink.vertex_buffers[0].1, 36);
        assert_eq!(sink.index_buffers, vec![(IndexFormat::Uint16, 6)]);
        // Handles stay distinct across buffer kinds.
        assert_eq!(uploaded[0].vertex_buffer.id(), 0);
        assert_eq!(uploaded[0].index_buffer.unwrap().id(), 1);
        assert_eq!(uploaded[1].vertex_buffer.id(), 2);
    }
}
