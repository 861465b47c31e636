//! Index stream normalization.

use crate::accessor::AccessorView;
use crate::buffer::element_run;
use crate::document::{ComponentType, Document};
use crate::error::GeometryError;
use crate::geometry::{IndexData, IndexFormat};

/// Decode an index accessor into a 16-bit or 32-bit stream.
///
/// The output width is chosen by the source component type alone: 8-bit
/// sources widen to 16 bits, 16-bit sources copy through, and 32-bit
/// sources stay 32-bit even when every value would fit in 16. Value range
/// never changes the width, so the same source always produces the same
/// format.
pub fn normalize_indices(
    document: &Document,
    accessor_index: usize,
) -> Result<IndexData, GeometryError> {
    let view = AccessorView::for_indices(document, accessor_index)?;
    let subject = format!("indices (accessor {accessor_index})");
    let src = view.bytes();
    let count = view.count;

    let (format, data) = match view.component {
        ComponentType::I8 | ComponentType::U8 => {
            let signed = view.component == ComponentType::I8;
            let mut indices: Vec<u16> = Vec::with_capacity(count);
            for i in 0..count {
                let run = element_run(src, i * view.stride, 1)
                    .map_err(|e| e.into_layout_error(&subject))?;
                // Widen to 16 bits: sign-extend signed bytes, zero-extend
                // unsigned ones.
                let value = if signed {
                    (run[0] as i8) as i16 as u16
                } else {
                    run[0] as u16
                };
                indices.push(value);
            }
            (IndexFormat::Uint16, bytemuck::cast_slice(&indices).to_vec())
        }
        ComponentType::I16 | ComponentType::U16 => {
            let mut indices: Vec<u16> = Vec::with_capacity(count);
            for i in 0..count {
                let run = element_run(src, i * view.stride, 2)
                    .map_err(|e| e.into_layout_error(&subject))?;
                indices.push(u16::from_le_bytes([run[0], run[1]]));
            }
            (IndexFormat::Uint16, bytemuck::cast_slice(&indices).to_vec())
        }
        // Signed and unsigned 32-bit sources share one path.
        ComponentType::I32 | ComponentType::U32 => {
            let mut indices: Vec<u32> = Vec::with_capacity(count);
            for i in 0..count {
                let run = element_run(src, i * view.stride, 4)
                    .map_err(|e| e.into_layout_error(&subject))?;
                indices.push(u32::from_le_bytes([run[0], run[1], run[2], run[3]]));
            }
            (IndexFormat::Uint32, bytemuck::cast_slice(&indices).to_vec())
        }
        other => {
            return Err(GeometryError::UnsupportedFormat {
                subject,
                detail: format!("component type {other:?} is not usable for indices"),
            });
        }
    };

    Ok(IndexData {
        format,
        data,
        count: count as u32,
    })
}
