//! Builds a [`Document`] from raw glTF bytes.
//!
//! Accepts both binary `.glb` containers and JSON `.gltf` text. Binary
//! buffers come from the embedded blob; `data:` URIs are decoded inline.
//! External file URIs are refused here, fetching them is the caller's job.

use thiserror::Error;

use crate::document::{Accessor, BufferView, ComponentType, Document, ElementShape, Mesh, Primitive};

/// Errors raised while turning glTF bytes into a [`Document`].
#[derive(Debug, Error)]
pub enum ImportError {
    /// The glTF container or JSON failed to parse.
    #[error("glTF parse error: {0}")]
    Parse(#[from] gltf::Error),

    /// A buffer could not be resolved to bytes.
    #[error("buffer error: {0}")]
    Buffer(String),
}

/// Parse glTF bytes and resolve every buffer, producing a document the
/// conversion pipeline can consume.
pub fn document_from_slice(data: &[u8]) -> Result<Document, ImportError> {
    let gltf = gltf::Gltf::from_slice(data)?;
    let buffers = resolve_buffers(&gltf.document, gltf.blob)?;

    let views = gltf
        .document
        .views()
        .map(|view| BufferView {
            buffer: view.buffer().index(),
            offset: view.offset(),
            length: view.length(),
            stride: view.stride().unwrap_or(0) as u32,
        })
        .collect();

    let accessors = gltf
        .document
        .accessors()
        .map(|accessor| Accessor {
            view: accessor.view().map(|v| v.index()),
            offset: accessor.offset(),
            component_type: component_code(accessor.data_type()),
            shape: element_shape(accessor.dimensions()),
            count: accessor.count(),
            min: number_array(accessor.min()),
            max: number_array(accessor.max()),
        })
        .collect();

    let meshes = gltf
        .document
        .meshes()
        .map(|mesh| Mesh {
            name: mesh.name().map(String::from),
            primitives: mesh
                .primitives()
                .map(|primitive| Primitive {
                    attributes: primitive
                        .attributes()
                        .map(|(semantic, accessor)| (attribute_name(&semantic), accessor.index()))
                        .collect(),
                    indices: primitive.indices().map(|a| a.index()),
                    mode: mode_code(primitive.mode()),
                })
                .collect(),
        })
        .collect();

    log::debug!(
        "imported glTF document: {} buffers, {} accessors, {} meshes",
        gltf.document.buffers().count(),
        gltf.document.accessors().count(),
        gltf.document.meshes().count(),
    );

    Ok(Document {
        buffers,
        views,
        accessors,
        meshes,
    })
}

/// Resolve every buffer to raw bytes.
fn resolve_buffers(
    document: &gltf::Document,
    mut blob: Option<Vec<u8>>,
) -> Result<Vec<Vec<u8>>, ImportError> {
    let mut buffers = Vec::with_capacity(document.buffers().count());
    for buffer in document.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                // Only the first buffer may reference the GLB blob.
                let data = blob.take().ok_or_else(|| {
                    ImportError::Buffer("binary chunk referenced but not present".to_string())
                })?;
                buffers.push(data);
            }
            gltf::buffer::Source::Uri(uri) => match parse_data_uri(uri) {
                Some(data) => buffers.push(data),
                None => {
                    return Err(ImportError::Buffer(format!(
                        "buffer {} has an external URI, which is not supported here",
                        buffer.index()
                    )));
                }
            },
        }
    }
    Ok(buffers)
}

/// Decode a `data:` URI payload, or `None` when the URI is something else.
fn parse_data_uri(uri: &str) -> Option<Vec<u8>> {
    let rest = uri.strip_prefix("data:")?;
    let (_mime, payload) = rest.split_once(";base64,")?;
    base64_decode(payload)
}

/// Minimal base64 decoder for embedded buffer payloads; avoids pulling in a
/// dependency for one call site.
fn base64_decode(input: &str) -> Option<Vec<u8>> {
    fn decode_char(c: u8) -> Option<u8> {
        match c {
            b'A'..=b'Z' => Some(c - b'A'),
            b'a'..=b'z' => Some(c - b'a' + 26),
            b'0'..=b'9' => Some(c - b'0' + 52),
            b'+' => Some(62),
            b'/' => Some(63),
            _ => None,
        }
    }

    let cleaned: Vec<u8> = input
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    let mut out = Vec::with_capacity(cleaned.len() / 4 * 3);

    for chunk in cleaned.chunks(4) {
        let mut acc = 0u32;
        let mut bits = 0u32;
        for &c in chunk {
            if c == b'=' {
                break;
            }
            acc = (acc << 6) | decode_char(c)? as u32;
            bits += 6;
        }
        while bits >= 8 {
            bits -= 8;
            out.push((acc >> bits) as u8);
        }
    }
    Some(out)
}

fn component_code(data_type: gltf::accessor::DataType) -> u32 {
    use gltf::accessor::DataType;
    let ty = match data_type {
        DataType::I8 => ComponentType::I8,
        DataType::U8 => ComponentType::U8,
        DataType::I16 => ComponentType::I16,
        DataType::U16 => ComponentType::U16,
        DataType::U32 => ComponentType::U32,
        DataType::F32 => ComponentType::F32,
    };
    ty.code()
}

fn element_shape(dimensions: gltf::accessor::Dimensions) -> ElementShape {
    use gltf::accessor::Dimensions;
    match dimensions {
        Dimensions::Scalar => ElementShape::Scalar,
        Dimensions::Vec2 => ElementShape::Vec2,
        Dimensions::Vec3 => ElementShape::Vec3,
        Dimensions::Vec4 => ElementShape::Vec4,
        Dimensions::Mat2 => ElementShape::Mat2,
        Dimensions::Mat3 => ElementShape::Mat3,
        Dimensions::Mat4 => ElementShape::Mat4,
    }
}

fn mode_code(mode: gltf::mesh::Mode) -> u32 {
    use gltf::mesh::Mode;
    match mode {
        Mode::Points => 0,
        Mode::Lines => 1,
        Mode::LineLoop => 2,
        Mode::LineStrip => 3,
        Mode::Triangles => 4,
        Mode::TriangleStrip => 5,
        Mode::TriangleFan => 6,
    }
}

/// Render a parsed semantic back into its canonical attribute name.
fn attribute_name(semantic: &gltf::Semantic) -> String {
    use gltf::Semantic;
    match semantic {
        Semantic::Positions => "POSITION".to_string(),
        Semantic::Normals => "NORMAL".to_string(),
        Semantic::Tangents => "TANGENT".to_string(),
        Semantic::Colors(set) => format!("COLOR_{set}"),
        Semantic::TexCoords(set) => format!("TEXCOORD_{set}"),
        Semantic::Joints(set) => format!("JOINTS_{set}"),
        Semantic::Weights(set) => format!("WEIGHTS_{set}"),
    }
}

fn number_array(value: Option<gltf::json::Value>) -> Option<Vec<f64>> {
    let value = value?;
    let array = value.as_array()?;
    Some(array.iter().filter_map(|v| v.as_f64()).collect())
}
