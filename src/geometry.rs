//! GPU-ready geometry: vertex layouts, index data, and converted meshes.

use crate::bounds::BoundingVolume;
use crate::buffer::ElementType;
use crate::error::GeometryError;
use crate::skin::BoneAssignment;

// ============================================================================
// Vertex Semantics
// ============================================================================

/// Logical meaning of a vertex attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VertexSemantic {
    /// Vertex position (3D coordinates).
    Position,
    /// Vertex normal vector.
    Normal,
    /// Tangent vector.
    Tangent,
    /// Texture coordinates; both source UV sets map onto this one semantic.
    TexCoord,
    /// Vertex color.
    Color,
    /// Bone indices for skinning.
    BlendIndices,
    /// Bone weights for skinning.
    BlendWeights,
    /// An attribute name outside the fixed mapping, carried through rather
    /// than dropped.
    Unrecognized(String),
}

// ============================================================================
// Topology and Index Formats
// ============================================================================

/// How vertices are assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveTopology {
    PointList,
    LineList,
    LineStrip,
    #[default]
    TriangleList,
    TriangleStrip,
    TriangleFan,
}

impl PrimitiveTopology {
    /// Map a raw glTF draw-mode code onto a topology.
    ///
    /// Line loops have no GPU equivalent here and collapse to strips; a code
    /// outside the seven known ones is an error, never defaulted.
    pub fn from_mode(mode: u32) -> Result<Self, GeometryError> {
        match mode {
            0 => Ok(Self::PointList),
            1 => Ok(Self::LineList),
            2 | 3 => Ok(Self::LineStrip),
            4 => Ok(Self::TriangleList),
            5 => Ok(Self::TriangleStrip),
            6 => Ok(Self::TriangleFan),
            other => Err(GeometryError::UnsupportedFormat {
                subject: "draw mode".to_string(),
                detail: format!("unrecognized mode code {other}"),
            }),
        }
    }
}

/// Index element width for indexed drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexFormat {
    /// 16-bit unsigned indices.
    Uint16,
    /// 32-bit unsigned indices.
    Uint32,
}

impl IndexFormat {
    /// Size of one index in bytes.
    pub fn size(self) -> usize {
        match self {
            Self::Uint16 => 2,
            Self::Uint32 => 4,
        }
    }
}

// ============================================================================
// Vertex Layout
// ============================================================================

/// One attribute slot within an interleaved vertex buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexElement {
    pub semantic: VertexSemantic,
    /// Scalar encoding of each component.
    pub element: ElementType,
    /// Scalar components per vertex.
    pub components: u32,
    /// Byte offset within one vertex.
    pub offset: u32,
}

impl VertexElement {
    /// Bytes this element occupies per vertex.
    pub fn byte_size(&self) -> u32 {
        self.components * self.element.size() as u32
    }
}

/// Ordered element layout of an interleaved vertex buffer.
///
/// Element order matches the source attribute order; offsets are contiguous
/// and sum to the stride.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VertexLayout {
    pub elements: Vec<VertexElement>,
    /// Bytes per vertex.
    pub stride: u32,
}

impl VertexLayout {
    /// Find the element carrying a semantic, if present.
    pub fn find(&self, semantic: &VertexSemantic) -> Option<&VertexElement> {
        self.elements.iter().find(|e| e.semantic == *semantic)
    }

    pub fn has_semantic(&self, semantic: &VertexSemantic) -> bool {
        self.find(semantic).is_some()
    }
}

// ============================================================================
// Converted Geometry
// ============================================================================

/// A normalized index stream, ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexData {
    pub format: IndexFormat,
    /// Little-endian index bytes, `count * format.size()` long.
    pub data: Vec<u8>,
    /// Number of indices.
    pub count: u32,
}

/// GPU-ready geometry for one primitive.
#[derive(Debug, Clone)]
pub struct PrimitiveGeometry {
    /// Label derived from the mesh name, for buffer diagnostics.
    pub label: Option<String>,
    pub topology: PrimitiveTopology,
    /// Interleaved vertex bytes, `vertex_count * layout.stride` long.
    pub vertex_data: Vec<u8>,
    pub layout: VertexLayout,
    pub vertex_count: u32,
    /// Normalized indices, when the source primitive was indexed.
    pub indices: Option<IndexData>,
    /// Bone assignments, empty for unskinned primitives.
    pub assignments: Vec<BoneAssignment>,
}

/// Converted geometry for a whole mesh.
#[derive(Debug, Clone)]
pub struct MeshGeometry {
    pub name: Option<String>,
    pub primitives: Vec<PrimitiveGeometry>,
    /// Bounds from the first position attribute's declared metadata, absent
    /// when no primitive carries positions.
    pub bounds: Option<BoundingVolume>,
}
