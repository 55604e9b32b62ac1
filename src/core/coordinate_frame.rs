use nalgebra::{Matrix3, Matrix4, Rotation3, UnitQuaternion, Vector3, Vector4};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Closed set of directions a data axis may point to in the canonical frame.
///
/// The canonical frame has x = right, y = up, z = forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisDirection {
    Right,
    Left,
    Up,
    Down,
    Forward,
    Back,
}

impl AxisDirection {
    pub const ALL: [Self; 6] = [
        Self::Right,
        Self::Left,
        Self::Up,
        Self::Down,
        Self::Forward,
        Self::Back,
    ];

    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "right" => Some(Self::Right),
            "left" => Some(Self::Left),
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "forward" => Some(Self::Forward),
            "back" | "backward" => Some(Self::Back),
            _ => None,
        }
    }

    #[must_use]
    pub fn unit_vector(self) -> Vector3<f64> {
        match self {
            Self::Right => Vector3::new(1.0, 0.0, 0.0),
            Self::Left => Vector3::new(-1.0, 0.0, 0.0),
            Self::Up => Vector3::new(0.0, 1.0, 0.0),
            Self::Down => Vector3::new(0.0, -1.0, 0.0),
            Self::Forward => Vector3::new(0.0, 0.0, 1.0),
            Self::Back => Vector3::new(0.0, 0.0, -1.0),
        }
    }
}

/// Mapping from the axis convention a study was recorded in to the canonical frame.
///
/// Built once per study and handed to every import task by value, so parsing
/// never reads shared mutable state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateFrame {
    matrix: Matrix4<f64>,
    inverse: Matrix4<f64>,
}

impl Default for CoordinateFrame {
    fn default() -> Self {
        Self::identity()
    }
}

impl CoordinateFrame {
    #[must_use]
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
            inverse: Matrix4::identity(),
        }
    }

    /// Builds a frame from three axis directions.
    ///
    /// Returns `None` when the directions are not mutually orthogonal.
    #[must_use]
    pub fn from_directions(x: AxisDirection, y: AxisDirection, z: AxisDirection) -> Option<Self> {
        let basis = Matrix3::from_columns(&[x.unit_vector(), y.unit_vector(), z.unit_vector()]);
        if basis.determinant().abs() < 0.5 {
            return None;
        }

        let mut matrix = Matrix4::identity();
        matrix.fixed_view_mut::<3, 3>(0, 0).copy_from(&basis);
        // Signed permutation: the inverse is the transpose.
        let inverse = matrix.transpose();
        Some(Self { matrix, inverse })
    }

    /// Builds a frame from descriptor tokens.
    ///
    /// An unrecognized token, or tokens that do not form a basis, make the whole
    /// frame fall back to identity.
    #[must_use]
    pub fn from_tokens(x: &str, y: &str, z: &str) -> Self {
        let directions = (
            AxisDirection::from_token(x),
            AxisDirection::from_token(y),
            AxisDirection::from_token(z),
        );
        let (Some(dx), Some(dy), Some(dz)) = directions else {
            warn!(x, y, z, "unrecognized axis token; using identity coordinate frame");
            return Self::identity();
        };

        Self::from_directions(dx, dy, dz).unwrap_or_else(|| {
            warn!(x, y, z, "axis tokens do not form a basis; using identity coordinate frame");
            Self::identity()
        })
    }

    #[must_use]
    pub fn matrix(&self) -> Matrix4<f64> {
        self.matrix
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.matrix == Matrix4::identity()
    }

    #[must_use]
    pub fn inverse(&self) -> Self {
        Self {
            matrix: self.inverse,
            inverse: self.matrix,
        }
    }

    /// Re-expresses a vector authored in the data frame in the canonical frame.
    #[must_use]
    pub fn transform_vector(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        let out = self.matrix * Vector4::new(vector.x, vector.y, vector.z, 0.0);
        out.xyz()
    }

    /// Re-expresses a rotation authored in the data frame in the canonical frame
    /// (`frame * R * frame^-1`).
    #[must_use]
    pub fn conjugate_rotation(&self, rotation: &UnitQuaternion<f64>) -> UnitQuaternion<f64> {
        if self.is_identity() {
            return *rotation;
        }
        let frame = self.matrix.fixed_view::<3, 3>(0, 0).into_owned();
        let frame_inverse = self.inverse.fixed_view::<3, 3>(0, 0).into_owned();
        let conjugated = frame * rotation.to_rotation_matrix().into_inner() * frame_inverse;
        UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(conjugated))
    }
}
