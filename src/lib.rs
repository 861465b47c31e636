//! glTF Geometry - converts glTF mesh data into GPU-ready geometry
//!
//! The pipeline goes from raw glTF bytes to interleaved vertex buffers,
//! normalized index buffers, bounding volumes, and skinning assignments:
//!
//! 1. [`import::document_from_slice`] parses `.glb` or `.gltf` bytes and
//!    resolves every buffer into a [`Document`].
//! 2. [`convert_document`] (or [`convert_mesh`]) walks the accessor chains,
//!    degaps strided attributes, interleaves them vertex-major, widens or
//!    copies indices to 16/32-bit, and reads declared bounds.
//! 3. [`sink::upload_mesh`] pushes finished buffers through a
//!    [`sink::BufferSink`] such as the wgpu-backed one, returning opaque
//!    handles.
//!
//! Conversion is strict by design: unknown component types, malformed
//! strides, disagreeing vertex counts, and missing bounds metadata all fail
//! the mesh instead of producing partially converted geometry.
//!
//! ```ignore
//! let bytes = std::fs::read("model.glb")?;
//! let document = gltf_geometry::import::document_from_slice(&bytes)?;
//! let meshes = gltf_geometry::convert_document(&document)?;
//! let mut sink = gltf_geometry::sink::WgpuBufferSink::new(device);
//! for mesh in &meshes {
//!     let handles = gltf_geometry::sink::upload_mesh(&mut sink, mesh)?;
//! }
//! ```

pub mod accessor;
pub mod bounds;
pub mod buffer;
pub mod convert;
pub mod document;
pub mod error;
pub mod geometry;
pub mod import;
pub mod index;
pub mod sink;
pub mod skin;
pub mod vertex;

pub use convert::{convert_document, convert_mesh};
pub use document::Document;
pub use error::GeometryError;
pub use geometry::{MeshGeometry, PrimitiveGeometry};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
