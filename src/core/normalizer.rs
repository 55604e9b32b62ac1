use nalgebra::{UnitQuaternion, Vector3};

use crate::core::{CoordinateFrame, RotationFormat};

/// Converts raw parsed values from an entity's authored conventions into the
/// canonical frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateNormalizer {
    frame: CoordinateFrame,
    meters_per_unit: f64,
    rotation_format: RotationFormat,
}

impl CoordinateNormalizer {
    #[must_use]
    pub fn new(frame: CoordinateFrame, meters_per_unit: f64, rotation_format: RotationFormat) -> Self {
        Self {
            frame,
            meters_per_unit,
            rotation_format,
        }
    }

    #[must_use]
    pub fn frame(&self) -> CoordinateFrame {
        self.frame
    }

    #[must_use]
    pub fn rotation_format(&self) -> RotationFormat {
        self.rotation_format
    }

    /// Scales a local position to meters, then maps it into the canonical frame.
    #[must_use]
    pub fn position(&self, local: &Vector3<f64>) -> Vector3<f64> {
        self.frame.transform_vector(&(local * self.meters_per_unit))
    }

    /// Builds a unit rotation from raw components and conjugates it by the frame.
    #[must_use]
    pub fn rotation(&self, components: [f64; 4]) -> UnitQuaternion<f64> {
        let local = self.rotation_format.to_rotation(components);
        self.frame.conjugate_rotation(&local)
    }
}
