//! Element-typed byte buffers and the bounds-checked copy primitive.
//!
//! Every byte that moves between source data and output geometry goes
//! through [`element_run`] or [`copy_element_run`], so a malformed stride
//! or offset surfaces as an error instead of corrupting neighboring data.

use crate::error::GeometryError;

/// Scalar element types a [`TypedBuffer`] can carry.
///
/// This is the closed set of encodings the vertex pipeline emits: positions,
/// normals and the like as 32-bit floats, blend indices as 16-bit unsigned
/// integers. Source data outside this set is rejected during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// 16-bit unsigned integer.
    U16,
    /// 32-bit float.
    F32,
}

impl ElementType {
    /// Size of one element in bytes.
    pub fn size(self) -> usize {
        match self {
            Self::U16 => 2,
            Self::F32 => 4,
        }
    }
}

/// An owned byte buffer whose element type is fixed at construction.
///
/// The byte length is always a multiple of the element size; reads go
/// through the typed accessors rather than reinterpreting raw bytes at the
/// call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedBuffer {
    element: ElementType,
    data: Vec<u8>,
}

impl TypedBuffer {
    /// Create a zero-filled buffer holding `count` elements.
    pub fn zeroed(element: ElementType, count: usize) -> Self {
        Self {
            element,
            data: vec![0; count * element.size()],
        }
    }

    /// Element type tag.
    pub fn element_type(&self) -> ElementType {
        self.element
    }

    /// Size of one element in bytes.
    pub fn element_size(&self) -> usize {
        self.element.size()
    }

    /// Number of elements.
    pub fn element_count(&self) -> usize {
        self.data.len() / self.element.size()
    }

    /// Total size in bytes.
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Read element `index` as a `u16`.
    ///
    /// Like slice indexing, panics when `index` is out of range; callers
    /// validate counts before reading.
    pub fn u16_at(&self, index: usize) -> u16 {
        debug_assert_eq!(self.element, ElementType::U16);
        let at = index * 2;
        u16::from_le_bytes([self.data[at], self.data[at + 1]])
    }

    /// Read element `index` as an `f32`.
    ///
    /// Like slice indexing, panics when `index` is out of range; callers
    /// validate counts before reading.
    pub fn f32_at(&self, index: usize) -> f32 {
        debug_assert_eq!(self.element, ElementType::F32);
        let at = index * 4;
        f32::from_le_bytes([
            self.data[at],
            self.data[at + 1],
            self.data[at + 2],
            self.data[at + 3],
        ])
    }
}

/// A read or write that would land outside its buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RunOverrun {
    /// True when the source range overran, false for the destination.
    pub source: bool,
    pub offset: usize,
    pub len: usize,
    pub available: usize,
}

impl RunOverrun {
    pub fn into_layout_error(self, subject: &str) -> GeometryError {
        let side = if self.source { "source" } else { "destination" };
        GeometryError::InvalidLayout {
            subject: subject.to_string(),
            detail: format!(
                "{side} run of {} bytes at offset {} exceeds {} available bytes",
                self.len, self.offset, self.available
            ),
        }
    }
}

fn range_ok(buf_len: usize, offset: usize, len: usize) -> bool {
    match offset.checked_add(len) {
        Some(end) => end <= buf_len,
        None => false,
    }
}

/// Borrow one element run of `len` bytes at `offset`, verifying bounds.
pub(crate) fn element_run(buf: &[u8], offset: usize, len: usize) -> Result<&[u8], RunOverrun> {
    if !range_ok(buf.len(), offset, len) {
        return Err(RunOverrun {
            source: true,
            offset,
            len,
            available: buf.len(),
        });
    }
    Ok(&buf[offset..offset + len])
}

/// Copy one element run of `len` bytes between buffers, verifying both
/// ranges before any byte moves.
pub(crate) fn copy_element_run(
    src: &[u8],
    src_offset: usize,
    dst: &mut [u8],
    dst_offset: usize,
    len: usize,
) -> Result<(), RunOverrun> {
    let run = element_run(src, src_offset, len)?;
    if !range_ok(dst.len(), dst_offset, len) {
        return Err(RunOverrun {
            source: false,
            offset: dst_offset,
            len,
            available: dst.len(),
        });
    }
    dst[dst_offset..dst_offset + len].copy_from_slice(run);
    Ok(())
}
