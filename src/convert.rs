//! The per-mesh conversion pipeline.
//!
//! Walks a [`Document`] mesh by mesh and primitive by primitive: extract
//! every attribute, interleave, normalize indices, read declared bounds,
//! and expand skinning data. Conversion of a mesh is all-or-nothing; the
//! first failing primitive aborts the mesh with no partial output.

use crate::bounds::{self, BoundingVolume};
use crate::document::Document;
use crate::error::GeometryError;
use crate::geometry::{MeshGeometry, PrimitiveGeometry, PrimitiveTopology, VertexSemantic};
use crate::index::normalize_indices;
use crate::skin::build_assignments;
use crate::vertex::{self, VertexBufferPart};

/// Convert every mesh in a document, in document order.
pub fn convert_document(document: &Document) -> Result<Vec<MeshGeometry>, GeometryError> {
    (0..document.meshes.len())
        .map(|i| convert_mesh(document, i))
        .collect()
}

/// Convert one mesh into GPU-ready geometry.
pub fn convert_mesh(
    document: &Document,
    mesh_index: usize,
) -> Result<MeshGeometry, GeometryError> {
    let mesh = document
        .meshes
        .get(mesh_index)
        .ok_or_else(|| GeometryError::InvalidLayout {
            subject: format!("mesh {mesh_index}"),
            detail: "mesh index out of range".to_string(),
        })?;

    let mut primitives = Vec::with_capacity(mesh.primitives.len());
    let mut mesh_bounds: Option<BoundingVolume> = None;

    for (prim_index, primitive) in mesh.primitives.iter().enumerate() {
        let topology = PrimitiveTopology::from_mode(primitive.mode)?;

        // Extract every attribute in source order; order decides the
        // interleaved slot order.
        let mut parts: Vec<VertexBufferPart> = Vec::with_capacity(primitive.attributes.len());
        for (name, accessor_index) in &primitive.attributes {
            let part = vertex::extract_part(document, name, *accessor_index)?;

            if let VertexSemantic::Unrecognized(raw) = &part.semantic {
                log::debug!("mesh {mesh_index}: carrying unrecognized attribute {raw}");
            }

            // Mesh bounds come from the first position attribute seen, and
            // only from its declared metadata.
            if part.semantic == VertexSemantic::Position && mesh_bounds.is_none() {
                let accessor = &document.accessors[*accessor_index];
                mesh_bounds = Some(bounds::extract_bounds(accessor, *accessor_index)?);
            }

            parts.push(part);
        }

        let vertex_count = parts.first().map(|p| p.vertex_count).unwrap_or(0);
        let (vertex_data, layout) = vertex::interleave(&parts)?;

        let indices = match primitive.indices {
            Some(accessor_index) => Some(normalize_indices(document, accessor_index)?),
            None => None,
        };

        let blend_indices = parts.iter().find(|p| p.semantic == VertexSemantic::BlendIndices);
        let blend_weights = parts.iter().find(|p| p.semantic == VertexSemantic::BlendWeights);
        let assignments = match (blend_indices, blend_weights) {
            (Some(bi), Some(bw)) => build_assignments(bi, bw)?,
            _ => Vec::new(),
        };

        let label = mesh.name.as_ref().map(|name| {
            if mesh.primitives.len() > 1 {
                format!("{name}_prim{prim_index}")
            } else {
                name.clone()
            }
        });

        log::debug!(
            "mesh {mesh_index} primitive {prim_index}: {} vertices, stride {}, {} indices, {} assignments",
            vertex_count,
            layout.stride,
            indices.as_ref().map(|i| i.count).unwrap_or(0),
            assignments.len(),
        );

        primitives.push(PrimitiveGeometry {
            label,
            topology,
            vertex_data,
            layout,
            vertex_count,
            indices,
            assignments,
        });
    }

    Ok(MeshGeometry {
        name: mesh.name.clone(),
        primitives,
        bounds: mesh_bounds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Accessor, BufferView, ComponentType, ElementShape, Mesh, Primitive};

    fn f32_bytes(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    /// A single triangle with positions only, tightly packed.
    fn triangle_document() -> Document {
        let positions = f32_bytes(&[
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            0.0, 1.0, 0.0,
        ]);
        let length = positions.len();
        Document {
            buffers: vec![positions],
            views: vec![BufferView { buffer: 0, offset: 0, length, stride: 0 }],
            accessors: vec![Accessor {
                view: Some(0),
                component_type: ComponentType::F32.code(),
                shape: ElementShape::Vec3,
                count: 3,
                min: Some(vec![0.0, 0.0, 0.0]),
                max: Some(vec![1.0, 1.0, 0.0]),
                ..Default::default()
            }],
            meshes: vec![Mesh {
                name: Some("tri".to_string()),
                primitives: vec![Primitive {
                    attributes: vec![("POSITION".to_string(), 0)],
                    indices: None,
                    mode: 4,
                }],
            }],
        }
    }

    #[test]
    fn test_convert_single_triangle() {
        let document = triangle_document();
        let mesh = convert_mesh(&document, 0).unwrap();
        assert_eq!(mesh.name.as_deref(), Some("tri"));
        assert_eq!(mesh.primitives.len(), 1);

        let primitive = &mesh.primitives[0];
        assert_eq!(primitive.label.as_deref(), Some("tri"));
        assert_eq!(primitive.topology, PrimitiveTopology::TriangleList);
        assert_eq!(primitive.vertex_count, 3);
        assert_eq!(primitive.layout.stride, 12);
        assert!(primitive.indices.is_none());
        assert!(primitive.assignments.is_empty());

        let bounds = mesh.bounds.unwrap();
        assert_eq!(bounds.max.x, 1.0);
    }

    #[test]
    fn test_primitive_labels_get_suffixed() {
        let mut document = triangle_document();
        let primitive = document.meshes[0].primitives[0].clone();
        document.meshes[0].primitives.push(primitive);

        let mesh = convert_mesh(&document, 0).unwrap();
        assert_eq!(mesh.primitives[0].label.as_deref(), Some("tri_prim0"));
        assert_eq!(mesh.primitives[1].label.as_deref(), Some("tri_prim1"));
    }

    #[test]
    fn test_position_without_metadata_fails() {
        let mut document = triangle_document();
        document.accessors[0].min = None;
        let err = convert_mesh(&document, 0).unwrap_err();
        assert!(matches!(err, GeometryError::MissingBounds { .. }));
    }

    #[test]
    fn test_mesh_without_positions_has_no_bounds() {
        let mut document = triangle_document();
        document.meshes[0].primitives[0].attributes[0].0 = "NORMAL".to_string();
        let mesh = convert_mesh(&document, 0).unwrap();
        assert!(mesh.bounds.is_none());
        assert!(mesh.primitives[0]
            .layout
            .has_semantic(&VertexSemantic::Normal));
    }

    #[test]
    fn test_mesh_index_out_of_range() {
        let document = triangle_document();
        assert!(matches!(
            convert_mesh(&document, 5).unwrap_err(),
            GeometryError::InvalidLayout { .. }
        ));
    }

    #[test]
    fn test_unknown_mode_aborts_mesh() {
        let mut document = triangle_document();
        document.meshes[0].primitives[0].mode = 42;
        assert!(matches!(
            convert_mesh(&document, 0).unwrap_err(),
            GeometryError::UnsupportedFormat { .. }
        ));
    }

    #[test]
    fn test_convert_document_order() {
        let mut document = triangle_document();
        let mut second = document.meshes[0].clone();
        second.name = Some("tri2".to_string());
        document.meshes.push(second);

        let meshes = convert_document(&document).unwrap();
        assert_eq!(meshes.len(), 2);
        assert_eq!(meshes[0].name.as_deref(), Some("tri"));
        assert_eq!(meshes[1].name.as_deref(), Some("tri2"));
    }
}
