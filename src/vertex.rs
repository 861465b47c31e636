//! Vertex attribute extraction and interleaving.
//!
//! Extraction pulls one named attribute out of the source document into a
//! tightly packed [`VertexBufferPart`], whatever the source stride looked
//! like. Interleaving then lays a set of parts out as a single
//! vertex-major buffer with a [`VertexLayout`] describing the slots.

use crate::accessor::AccessorView;
use crate::buffer::{copy_element_run, ElementType, TypedBuffer};
use crate::document::{ComponentType, Document};
use crate::error::GeometryError;
use crate::geometry::{VertexElement, VertexLayout, VertexSemantic};

/// Map a source attribute name onto its semantic.
///
/// Names outside the fixed table become [`VertexSemantic::Unrecognized`]
/// and still flow through extraction and interleaving.
pub fn map_semantic(name: &str) -> VertexSemantic {
    match name {
        "POSITION" => VertexSemantic::Position,
        "NORMAL" => VertexSemantic::Normal,
        "TANGENT" => VertexSemantic::Tangent,
        // Both UV sets collapse onto the one texture-coordinate slot.
        "TEXCOORD_0" | "TEXCOORD_1" => VertexSemantic::TexCoord,
        "COLOR_0" => VertexSemantic::Color,
        "JOINTS_0" => VertexSemantic::BlendIndices,
        "WEIGHTS_0" => VertexSemantic::BlendWeights,
        other => VertexSemantic::Unrecognized(other.to_string()),
    }
}

/// One attribute's worth of vertex data, tightly packed.
///
/// Holds exactly `vertex_count * components` scalars back to back; the
/// source stride is gone by the time a part exists.
#[derive(Debug, Clone)]
pub struct VertexBufferPart {
    /// The packed scalar data.
    pub buffer: TypedBuffer,
    /// Attribute semantic.
    pub semantic: VertexSemantic,
    /// Source attribute name, kept for diagnostics.
    pub name: String,
    /// Number of vertices.
    pub vertex_count: u32,
    /// Scalar components per vertex.
    pub components: u32,
}

impl VertexBufferPart {
    /// Bytes occupied by one vertex in this part.
    pub fn vertex_stride(&self) -> usize {
        self.components as usize * self.buffer.element_size()
    }
}

/// Extract one named attribute into a tightly packed part.
///
/// Only 32-bit float and 16-bit unsigned sources are supported; everything
/// else, including double precision, fails before any bytes move.
pub fn extract_part(
    document: &Document,
    name: &str,
    accessor_index: usize,
) -> Result<VertexBufferPart, GeometryError> {
    let view = AccessorView::for_attribute(document, accessor_index)?;
    let subject = format!("attribute {name} (accessor {accessor_index})");

    let element = match view.component {
        ComponentType::F32 => ElementType::F32,
        ComponentType::U16 => ElementType::U16,
        other => {
            return Err(GeometryError::UnsupportedFormat {
                subject,
                detail: format!("component type {other:?} is not supported for vertex attributes"),
            });
        }
    };

    let run = view.element_size();
    let src = view.bytes();
    let mut buffer = TypedBuffer::zeroed(element, view.count * view.components);
    let dst = buffer.as_bytes_mut();
    for i in 0..view.count {
        copy_element_run(src, i * view.stride, dst, i * run, run)
            .map_err(|e| e.into_layout_error(&subject))?;
    }

    Ok(VertexBufferPart {
        buffer,
        semantic: map_semantic(name),
        name: name.to_string(),
        vertex_count: view.count as u32,
        components: view.components as u32,
    })
}

/// Interleave parts into a single vertex buffer plus its layout.
///
/// The first part sets the reference vertex count; a part disagreeing with
/// it fails the whole operation before any output is allocated. Parts keep
/// their given order, which becomes the element order of the layout.
pub fn interleave(parts: &[VertexBufferPart]) -> Result<(Vec<u8>, VertexLayout), GeometryError> {
    let vertex_count = parts.first().map(|p| p.vertex_count).unwrap_or(0);
    for part in parts {
        if part.vertex_count != vertex_count {
            return Err(GeometryError::InconsistentVertexCount {
                subject: format!("attribute {}", part.name),
                expected: vertex_count,
                found: part.vertex_count,
            });
        }
    }

    let stride: usize = parts.iter().map(|p| p.vertex_stride()).sum();
    let mut data = vec![0u8; vertex_count as usize * stride];
    let mut elements = Vec::with_capacity(parts.len());
    let mut offset = 0usize;

    for part in parts {
        let run = part.vertex_stride();
        let src = part.buffer.as_bytes();
        for v in 0..vertex_count as usize {
            copy_element_run(src, v * run, &mut data, v * stride + offset, run)
                .map_err(|e| e.into_layout_error(&format!("attribute {}", part.name)))?;
        }
        elements.push(VertexElement {
            semantic: part.semantic.clone(),
            element: part.buffer.element_type(),
            components: part.components,
            offset: offset as u32,
        });
        offset += run;
    }

    Ok((
        data,
        VertexLayout {
            elements,
            stride: stride as u32,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Accessor, BufferView, ElementShape};

    fn part_from(element: ElementType, semantic: VertexSemantic, name: &str, vertex_count: u32, components: u32, bytes: &[u8]) -> VertexBufferPart {
        let mut buffer = TypedBuffer::zeroed(element, (vertex_count * components) as usize);
        buffer.as_bytes_mut().copy_from_slice(bytes);
        VertexBufferPart {
            buffer,
            semantic,
            name: name.to_string(),
            vertex_count,
            components,
        }
    }

    fn f32_bytes(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn test_map_semantic_table() {
        assert_eq!(map_semantic("POSITION"), VertexSemantic::Position);
        assert_eq!(map_semantic("NORMAL"), VertexSemantic::Normal);
        assert_eq!(map_semantic("TANGENT"), VertexSemantic::Tangent);
        assert_eq!(map_semantic("TEXCOORD_0"), VertexSemantic::TexCoord);
        assert_eq!(map_semantic("TEXCOORD_1"), VertexSemantic::TexCoord);
        assert_eq!(map_semantic("COLOR_0"), VertexSemantic::Color);
        assert_eq!(map_semantic("JOINTS_0"), VertexSemantic::BlendIndices);
        assert_eq!(map_semantic("WEIGHTS_0"), VertexSemantic::BlendWeights);
        assert_eq!(
            map_semantic("_CUSTOM_THING"),
            VertexSemantic::Unrecognized("_CUSTOM_THING".to_string())
        );
    }

    #[test]
    fn test_extract_degaps_strided_source() {
        // Two VEC3 positions padded out to a 16-byte stride.
        let mut buffer = vec![0u8; 32];
        buffer[..12].copy_from_slice(&f32_bytes(&[1.0, 2.0, 3.0]));
        buffer[16..28].copy_from_slice(&f32_bytes(&[4.0, 5.0, 6.0]));

        let document = Document {
            buffers: vec![buffer],
            views: vec![BufferView { buffer: 0, offset: 0, length: 32, stride: 16 }],
            accessors: vec![Accessor {
                view: Some(0),
                component_type: ComponentType::F32.code(),
                shape: ElementShape::Vec3,
                count: 2,
                ..Default::default()
            }],
            meshes: Vec::new(),
        };

        let part = extract_part(&document, "POSITION", 0).unwrap();
        assert_eq!(part.semantic, VertexSemantic::Position);
        assert_eq!(part.vertex_count, 2);
        assert_eq!(part.components, 3);
        // Tightly packed: the 4-byte pads are gone.
        assert_eq!(part.buffer.byte_len(), 24);
        assert_eq!(part.buffer.as_bytes(), f32_bytes(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]));
    }

    #[test]
    fn test_extract_u16_attribute() {
        let bytes: Vec<u8> = [3u16, 1, 4, 1].iter().flat_map(|v| v.to_le_bytes()).collect();
        let document = Document {
            buffers: vec![bytes.clone()],
            views: vec![BufferView { buffer: 0, offset: 0, length: 8, stride: 0 }],
            accessors: vec![Accessor {
                view: Some(0),
                component_type: ComponentType::U16.code(),
                shape: ElementShape::Vec4,
                count: 1,
                ..Default::default()
            }],
            meshes: Vec::new(),
        };

        let part = extract_part(&document, "JOINTS_0", 0).unwrap();
        assert_eq!(part.semantic, VertexSemantic::BlendIndices);
        assert_eq!(part.buffer.element_type(), ElementType::U16);
        assert_eq!(part.buffer.as_bytes(), bytes);
    }

    #[test]
    fn test_extract_rejects_unsupported_component() {
        let document = Document {
            buffers: vec![vec![0; 16]],
            views: vec![BufferView { buffer: 0, offset: 0, length: 16, stride: 0 }],
            accessors: vec![Accessor {
                view: Some(0),
                component_type: ComponentType::U8.code(),
                shape: ElementShape::Vec4,
                count: 4,
                ..Default::default()
            }],
            meshes: Vec::new(),
        };

        let err = extract_part(&document, "COLOR_0", 0).unwrap_err();
        match err {
            GeometryError::UnsupportedFormat { subject, .. } => {
                assert!(subject.contains("COLOR_0"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_extract_fails_when_count_overshoots_window() {
        // Three elements declared, room for two.
        let document = Document {
            buffers: vec![vec![0; 24]],
            views: vec![BufferView { buffer: 0, offset: 0, length: 24, stride: 0 }],
            accessors: vec![Accessor {
                view: Some(0),
                component_type: ComponentType::F32.code(),
                shape: ElementShape::Vec3,
                count: 3,
                ..Default::default()
            }],
            meshes: Vec::new(),
        };

        let err = extract_part(&document, "POSITION", 0).unwrap_err();
        assert!(matches!(err, GeometryError::InvalidLayout { .. }));
    }

    #[test]
    fn test_interleave_two_parts() {
        let positions = part_from(
            ElementType::F32,
            VertexSemantic::Position,
            "POSITION",
            2,
            3,
            &f32_bytes(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
        );
        let uvs = part_from(
            ElementType::F32,
            VertexSemantic::TexCoord,
            "TEXCOORD_0",
            2,
            2,
            &f32_bytes(&[0.0, 0.5, 1.0, 0.25]),
        );

        let (data, layout) = interleave(&[positions, uvs]).unwrap();
        assert_eq!(layout.stride, 20);
        assert_eq!(layout.elements.len(), 2);
        assert_eq!(layout.elements[0].semantic, VertexSemantic::Position);
        assert_eq!(layout.elements[0].offset, 0);
        assert_eq!(layout.elements[1].semantic, VertexSemantic::TexCoord);
        assert_eq!(layout.elements[1].offset, 12);
        assert_eq!(data.len(), 40);

        // Vertex 0: position then uv, then vertex 1.
        assert_eq!(&data[..12], f32_bytes(&[1.0, 2.0, 3.0]).as_slice());
        assert_eq!(&data[12..20], f32_bytes(&[0.0, 0.5]).as_slice());
        assert_eq!(&data[20..32], f32_bytes(&[4.0, 5.0, 6.0]).as_slice());
        assert_eq!(&data[32..40], f32_bytes(&[1.0, 0.25]).as_slice());
    }

    #[test]
    fn test_interleave_mixed_element_types() {
        let joints: Vec<u8> = [1u16, 2, 3, 4, 5, 6, 7, 8]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        let parts = [
            part_from(
                ElementType::F32,
                VertexSemantic::Position,
                "POSITION",
                2,
                3,
                &f32_bytes(&[0.0; 6]),
            ),
            part_from(ElementType::U16, VertexSemantic::BlendIndices, "JOINTS_0", 2, 4, &joints),
        ];

        let (data, layout) = interleave(&parts).unwrap();
        // 12 float bytes plus 8 joint bytes per vertex.
        assert_eq!(layout.stride, 20);
        assert_eq!(layout.elements[1].element, ElementType::U16);
        assert_eq!(layout.elements[1].offset, 12);
        assert_eq!(&data[12..20], &joints[..8]);
        assert_eq!(&data[32..40], &joints[8..]);
    }

    #[test]
    fn test_interleave_vertex_count_mismatch() {
        let parts = [
            part_from(
                ElementType::F32,
                VertexSemantic::Position,
                "POSITION",
                2,
                3,
                &f32_bytes(&[0.0; 6]),
            ),
            part_from(
                ElementType::F32,
                VertexSemantic::Normal,
                "NORMAL",
                3,
                3,
                &f32_bytes(&[0.0; 9]),
            ),
        ];

        let err = interleave(&parts).unwrap_err();
        match err {
            GeometryError::InconsistentVertexCount { subject, expected, found } => {
                assert_eq!(subject, "attribute NORMAL");
                assert_eq!(expected, 2);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_interleave_empty() {
        let (data, layout) = interleave(&[]).unwrap();
        assert!(data.is_empty());
        assert!(layout.elements.is_empty());
        assert_eq!(layout.stride, 0);
    }
}
