//! Source document model: buffers, views, accessors, meshes.
//!
//! Mirrors the glTF data model closely enough that a conversion pass can
//! resolve accessor chains without consulting the parser again. Component
//! types and draw modes keep their raw glTF codes so unsupported encodings
//! stay representable and are rejected during resolution, not at parse time.

/// Numeric encoding of a single scalar component.
///
/// Codes follow the glTF component-type table. [`ComponentType::from_code`]
/// returns `None` for any other code; resolution reports those as
/// unsupported rather than guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    F32,
    F64,
}

impl ComponentType {
    /// Decode a raw glTF component-type code.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            5120 => Some(Self::I8),
            5121 => Some(Self::U8),
            5122 => Some(Self::I16),
            5123 => Some(Self::U16),
            5124 => Some(Self::I32),
            5125 => Some(Self::U32),
            5126 => Some(Self::F32),
            5130 => Some(Self::F64),
            _ => None,
        }
    }

    /// The raw glTF code for this component type.
    pub fn code(self) -> u32 {
        match self {
            Self::I8 => 5120,
            Self::U8 => 5121,
            Self::I16 => 5122,
            Self::U16 => 5123,
            Self::I32 => 5124,
            Self::U32 => 5125,
            Self::F32 => 5126,
            Self::F64 => 5130,
        }
    }

    /// Size of one scalar of this type in bytes.
    pub fn size(self) -> usize {
        match self {
            Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::F64 => 8,
        }
    }
}

/// Element shape of an accessor: how many scalar components form one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ElementShape {
    #[default]
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

impl ElementShape {
    /// Scalar components per element; matrices count their flattened cells.
    pub fn component_count(self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Vec2 => 2,
            Self::Vec3 => 3,
            Self::Vec4 => 4,
            Self::Mat2 => 4,
            Self::Mat3 => 9,
            Self::Mat4 => 16,
        }
    }
}

/// A byte range within a buffer plus an optional stride between elements.
#[derive(Debug, Clone, Default)]
pub struct BufferView {
    /// Index of the backing buffer in [`Document::buffers`].
    pub buffer: usize,
    /// Byte offset of the view window within the buffer.
    pub offset: usize,
    /// Byte length of the view window.
    pub length: usize,
    /// Declared stride between elements in bytes; 0 means tightly packed.
    pub stride: u32,
}

/// Describes how to read typed, shaped elements out of a buffer view.
#[derive(Debug, Clone, Default)]
pub struct Accessor {
    /// Index of the buffer view, if any. Accessors without a view (sparse
    /// storage) are not supported by resolution.
    pub view: Option<usize>,
    /// Byte offset within the view where the first element starts.
    pub offset: usize,
    /// Raw component-type code, decoded via [`ComponentType::from_code`].
    pub component_type: u32,
    /// Element shape.
    pub shape: ElementShape,
    /// Number of elements.
    pub count: usize,
    /// Declared per-component minimum, as the source document stores it.
    pub min: Option<Vec<f64>>,
    /// Declared per-component maximum.
    pub max: Option<Vec<f64>>,
}

/// One drawable piece of a mesh.
#[derive(Debug, Clone)]
pub struct Primitive {
    /// Attribute name to accessor index, in source order. The order here
    /// determines the element order of the interleaved output buffer.
    pub attributes: Vec<(String, usize)>,
    /// Index accessor, if the primitive is indexed.
    pub indices: Option<usize>,
    /// Raw draw-mode code, decoded via
    /// [`PrimitiveTopology::from_mode`](crate::geometry::PrimitiveTopology::from_mode).
    pub mode: u32,
}

/// A named collection of primitives.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub name: Option<String>,
    pub primitives: Vec<Primitive>,
}

/// A parsed source document, ready for conversion.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub buffers: Vec<Vec<u8>>,
    pub views: Vec<BufferView>,
    pub accessors: Vec<Accessor>,
    pub meshes: Vec<Mesh>,
}
