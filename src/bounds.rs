//! Bounding volumes from declared accessor metadata.
//!
//! Bounds come exclusively from the min/max values a position accessor
//! declares; raw vertex data is never scanned. A position accessor without
//! usable metadata is an error, not an invitation to recompute.

use glam::Vec3;

use crate::document::Accessor;
use crate::error::GeometryError;

/// An axis-aligned bounding volume in model space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingVolume {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingVolume {
    /// The smallest volume containing both `self` and `other`.
    pub fn union(&self, other: &BoundingVolume) -> BoundingVolume {
        BoundingVolume {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Center point.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Edge lengths.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Derive a bounding volume from an accessor's declared min/max metadata.
///
/// Exactly the first three components of each corner are read; shorter or
/// absent declarations fail with [`GeometryError::MissingBounds`].
pub fn extract_bounds(
    accessor: &Accessor,
    accessor_index: usize,
) -> Result<BoundingVolume, GeometryError> {
    let subject = format!("position accessor {accessor_index}");
    let min = corner(accessor.min.as_deref(), "min", &subject)?;
    let max = corner(accessor.max.as_deref(), "max", &subject)?;
    Ok(BoundingVolume { min, max })
}

fn corner(values: Option<&[f64]>, which: &str, subject: &str) -> Result<Vec3, GeometryError> {
    let values = values.ok_or_else(|| GeometryError::MissingBounds {
        subject: subject.to_string(),
        detail: format!("no declared {which} values"),
    })?;
    if values.len() < 3 {
        return Err(GeometryError::MissingBounds {
            subject: subject.to_string(),
            detail: format!(
                "declared {which} has {} of 3 required components",
                values.len()
            ),
        });
    }
    Ok(Vec3::new(
        values[0] as f32,
        values[1] as f32,
        values[2] as f32,
    ))
}
