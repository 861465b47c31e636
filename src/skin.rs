//! Skinning bone assignments from blend-index and blend-weight parts.

use crate::buffer::ElementType;
use crate::error::GeometryError;
use crate::vertex::VertexBufferPart;

/// Association of one vertex with one bone and its blend weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneAssignment {
    pub vertex: u32,
    pub bone: u16,
    pub weight: f32,
}

/// Expand blend-index and blend-weight parts into per-slot assignments.
///
/// Both parts must agree on vertex count and influence slots per vertex.
/// Emission is vertex-major, slot-minor, and keeps zero-weight slots;
/// whatever binds the skeleton downstream decides what to ignore.
pub fn build_assignments(
    indices: &VertexBufferPart,
    weights: &VertexBufferPart,
) -> Result<Vec<BoneAssignment>, GeometryError> {
    if indices.buffer.element_type() != ElementType::U16 {
        return Err(GeometryError::UnsupportedFormat {
            subject: format!("attribute {}", indices.name),
            detail: format!(
                "blend indices must be 16-bit unsigned, found {:?}",
                indices.buffer.element_type()
            ),
        });
    }
    if weights.buffer.element_type() != ElementType::F32 {
        return Err(GeometryError::UnsupportedFormat {
            subject: format!("attribute {}", weights.name),
            detail: format!(
                "blend weights must be 32-bit float, found {:?}",
                weights.buffer.element_type()
            ),
        });
    }
    if weights.vertex_count != indices.vertex_count {
        return Err(GeometryError::InconsistentVertexCount {
            subject: format!("attribute {}", weights.name),
            expected: indices.vertex_count,
            found: weights.vertex_count,
        });
    }
    if weights.components != indices.components {
        return Err(GeometryError::InvalidLayout {
            subject: format!("attribute {}", weights.name),
            detail: format!(
                "influence slot count {} does not match blend index slot count {}",
                weights.components, indices.components
            ),
        });
    }

    let slots = indices.components as usize;
    let count = indices.vertex_count as usize;
    debug_assert_eq!(indices.buffer.element_count(), count * slots);
    debug_assert_eq!(weights.buffer.element_count(), count * slots);

    let mut assignments = Vec::with_capacity(count * slots);
    for vertex in 0..count {
        for slot in 0..slots {
            let at = vertex * slots + slot;
            assignments.push(BoneAssignment {
                vertex: vertex as u32,
                bone: indices.buffer.u16_at(at),
                weight: weights.buffer.f32_at(at),
            });
        }
    }
    Ok(assignments)
}
