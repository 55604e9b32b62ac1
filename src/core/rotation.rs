use nalgebra::{Quaternion, Unit, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// How rotation columns of a data file are authored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationFormat {
    /// Four components in `w, x, y, z` order.
    #[default]
    Quaternion,
    /// Three Euler angles in degrees.
    EulerDegrees,
    /// Three Euler angles in radians.
    EulerRadians,
    /// Three components of the direction the entity's forward axis points to.
    DirectionVector,
}

impl RotationFormat {
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "quaternion" | "quat" => Some(Self::Quaternion),
            "euler_degrees" | "eulerdegrees" | "degrees" => Some(Self::EulerDegrees),
            "euler_radians" | "eulerradians" | "radians" => Some(Self::EulerRadians),
            "direction" | "direction_vector" | "directionvector" => Some(Self::DirectionVector),
            _ => None,
        }
    }

    /// Number of source columns this convention consumes.
    #[must_use]
    pub fn component_count(self) -> usize {
        match self {
            Self::Quaternion => 4,
            Self::EulerDegrees | Self::EulerRadians | Self::DirectionVector => 3,
        }
    }

    /// Raw components of the identity rotation in this convention.
    #[must_use]
    pub fn identity_components(self) -> [f64; 4] {
        match self {
            Self::Quaternion => [1.0, 0.0, 0.0, 0.0],
            Self::EulerDegrees | Self::EulerRadians => [0.0; 4],
            Self::DirectionVector => [0.0, 0.0, 1.0, 0.0],
        }
    }

    /// Converts raw components into a unit rotation.
    ///
    /// Degenerate input (zero-length quaternion or direction) yields identity.
    #[must_use]
    pub fn to_rotation(self, components: [f64; 4]) -> UnitQuaternion<f64> {
        match self {
            Self::Quaternion => {
                let [w, x, y, z] = components;
                let quaternion = Quaternion::new(w, x, y, z);
                if !quaternion.norm().is_finite() || quaternion.norm() <= f64::EPSILON {
                    return UnitQuaternion::identity();
                }
                UnitQuaternion::from_quaternion(quaternion)
            }
            Self::EulerDegrees => euler_to_rotation(
                components[0].to_radians(),
                components[1].to_radians(),
                components[2].to_radians(),
            ),
            Self::EulerRadians => euler_to_rotation(components[0], components[1], components[2]),
            Self::DirectionVector => {
                direction_to_rotation(Vector3::new(components[0], components[1], components[2]))
            }
        }
    }
}

/// Euler angles applied around z, then x, then y (`R = Ry * Rx * Rz`).
#[must_use]
pub fn euler_to_rotation(x: f64, y: f64, z: f64) -> UnitQuaternion<f64> {
    let rx = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), x);
    let ry = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), y);
    let rz = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), z);
    ry * rx * rz
}

/// Shortest-arc rotation taking canonical forward onto `direction`.
#[must_use]
pub fn direction_to_rotation(direction: Vector3<f64>) -> UnitQuaternion<f64> {
    let norm = direction.norm();
    if !norm.is_finite() || norm <= f64::EPSILON {
        return UnitQuaternion::identity();
    }
    let forward = Vector3::z();
    UnitQuaternion::rotation_between(&forward, &direction).unwrap_or_else(|| {
        // Exactly opposite: any perpendicular axis works; use up.
        UnitQuaternion::from_axis_angle(&Unit::new_unchecked(Vector3::y()), std::f64::consts::PI)
    })
}
