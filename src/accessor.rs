//! Accessor chain resolution.
//!
//! An accessor names a buffer view, the view names a buffer; nothing about
//! that chain is trusted until it has been walked and bounds-checked here.
//! Resolution produces an [`AccessorView`]: a borrowed byte window plus the
//! decoded layout the copy loops need.

use crate::document::{ComponentType, Document, ElementShape};
use crate::error::GeometryError;

/// A resolved accessor: the byte window it addresses plus decoded layout.
///
/// The window starts at the accessor's first element and ends at the buffer
/// view's end; every element run is still bounds-checked against it on read,
/// so a count that overshoots the window fails at the offending element.
#[derive(Debug, Clone, Copy)]
pub struct AccessorView<'a> {
    data: &'a [u8],
    /// Effective stride between element runs in bytes.
    pub stride: usize,
    /// Number of elements.
    pub count: usize,
    /// Decoded component type.
    pub component: ComponentType,
    /// Scalar components per element run.
    pub components: usize,
}

impl<'a> AccessorView<'a> {
    /// Resolve an accessor for vertex attribute extraction.
    ///
    /// The element run spans the full shape, so a VEC3 of floats reads 12
    /// bytes per element. Only vector shapes have an attribute
    /// interpretation; scalar and matrix shapes are rejected. A declared
    /// view stride of zero means tightly packed; a nonzero stride below the
    /// run size is an error, never coerced.
    pub fn for_attribute(
        document: &'a Document,
        accessor_index: usize,
    ) -> Result<Self, GeometryError> {
        let chain = resolve_chain(document, accessor_index)?;
        let subject = format!("accessor {accessor_index}");

        let components = attribute_components(chain.shape).ok_or_else(|| {
            GeometryError::UnsupportedFormat {
                subject: subject.clone(),
                detail: format!(
                    "element shape {:?} is not usable as a vertex attribute",
                    chain.shape
                ),
            }
        })?;
        let run = chain.component.size() * components;
        let stride = effective_stride(chain.declared_stride, run, &subject)?;

        Ok(Self {
            data: chain.window,
            stride,
            count: chain.count,
            component: chain.component,
            components,
        })
    }

    /// Resolve an accessor for index decoding.
    ///
    /// Index streams are read one scalar at a time, so the element run is a
    /// single component and the declared shape plays no part. The stride
    /// floor is the component size.
    pub fn for_indices(
        document: &'a Document,
        accessor_index: usize,
    ) -> Result<Self, GeometryError> {
        let chain = resolve_chain(document, accessor_index)?;
        let subject = format!("accessor {accessor_index}");

        let run = chain.component.size();
        let stride = effective_stride(chain.declared_stride, run, &subject)?;

        Ok(Self {
            data: chain.window,
            stride,
            count: chain.count,
            component: chain.component,
            components: 1,
        })
    }

    /// Byte size of one element run.
    pub fn element_size(&self) -> usize {
        self.component.size() * self.components
    }

    /// The resolved byte window, starting at the accessor's base offset.
    pub fn bytes(&self) -> &'a [u8] {
        self.data
    }
}

struct ResolvedChain<'a> {
    window: &'a [u8],
    declared_stride: u32,
    count: usize,
    component: ComponentType,
    shape: ElementShape,
}

/// Walk accessor, buffer view, buffer and slice out the accessor's window.
fn resolve_chain(
    document: &Document,
    accessor_index: usize,
) -> Result<ResolvedChain<'_>, GeometryError> {
    let subject = format!("accessor {accessor_index}");

    let accessor = document.accessors.get(accessor_index).ok_or_else(|| {
        GeometryError::InvalidLayout {
            subject: subject.clone(),
            detail: "accessor index out of range".to_string(),
        }
    })?;
    let view_index = accessor.view.ok_or_else(|| GeometryError::InvalidLayout {
        subject: subject.clone(),
        detail: "accessor has no buffer view (sparse storage is not supported)".to_string(),
    })?;
    let view = document.views.get(view_index).ok_or_else(|| GeometryError::InvalidLayout {
        subject: subject.clone(),
        detail: format!("buffer view index {view_index} out of range"),
    })?;
    let buffer = document.buffers.get(view.buffer).ok_or_else(|| {
        GeometryError::InvalidLayout {
            subject: subject.clone(),
            detail: format!("buffer index {} out of range", view.buffer),
        }
    })?;

    let view_end = view
        .offset
        .checked_add(view.length)
        .filter(|end| *end <= buffer.len())
        .ok_or_else(|| GeometryError::InvalidLayout {
            subject: subject.clone(),
            detail: format!(
                "view window at offset {} with length {} exceeds buffer of {} bytes",
                view.offset,
                view.length,
                buffer.len()
            ),
        })?;
    let window = &buffer[view.offset..view_end];

    if accessor.offset > window.len() {
        return Err(GeometryError::InvalidLayout {
            subject,
            detail: format!(
                "accessor offset {} exceeds view length {}",
                accessor.offset,
                window.len()
            ),
        });
    }

    let component = ComponentType::from_code(accessor.component_type).ok_or_else(|| {
        GeometryError::UnsupportedFormat {
            subject: subject.clone(),
            detail: format!("unknown component type code {}", accessor.component_type),
        }
    })?;
    if component == ComponentType::F64 {
        return Err(GeometryError::UnsupportedFormat {
            subject,
            detail: "double precision is not implemented".to_string(),
        });
    }

    Ok(ResolvedChain {
        window: &window[accessor.offset..],
        declared_stride: view.stride,
        count: accessor.count,
        component,
        shape: accessor.shape,
    })
}

/// Shapes with a vertex attribute interpretation, mapped to their scalar
/// component count.
fn attribute_components(shape: ElementShape) -> Option<usize> {
    match shape {
        ElementShape::Vec2 => Some(2),
        ElementShape::Vec3 => Some(3),
        ElementShape::Vec4 => Some(4),
        _ => None,
    }
}

/// Apply the stride rule: zero means tightly packed, below the element run
/// size is malformed, anything else is taken as declared.
fn effective_stride(declared: u32, run: usize, subject: &str) -> Result<usize, GeometryError> {
    let declared = declared as usize;
    if declared == 0 {
        Ok(run)
    } else if declared < run {
        Err(GeometryError::InvalidLayout {
            subject: subject.to_string(),
            detail: format!("declared stride {declared} is below the {run}-byte element size"),
        })
    } else {
        Ok(declared)
    }
}
