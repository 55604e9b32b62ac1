use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::core::primitives::ticks_to_seconds;

/// Fixed-point timestamp unit: 10,000,000 ticks per second.
pub type Ticks = i64;

/// One timestamped observation of an entity in the canonical frame.
///
/// Position is expressed in meters. `timestamp` is shifted once during
/// timestamp normalization and `speed` is written once by the import task;
/// everything else is fixed once the sample is appended to a cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub position: Vector3<f64>,
    pub rotation: UnitQuaternion<f64>,
    pub scale: Vector3<f64>,
    pub timestamp: Ticks,
    pub state: Option<String>,
    pub speed: f64,
}

impl Sample {
    #[must_use]
    pub fn new(
        position: Vector3<f64>,
        rotation: UnitQuaternion<f64>,
        scale: Vector3<f64>,
        timestamp: Ticks,
    ) -> Self {
        Self {
            position,
            rotation,
            scale,
            timestamp,
            state: None,
            speed: 0.0,
        }
    }

    /// Sample located at `position` with identity rotation and unit scale.
    #[must_use]
    pub fn at(position: Vector3<f64>, timestamp: Ticks) -> Self {
        Self::new(
            position,
            UnitQuaternion::identity(),
            Vector3::new(1.0, 1.0, 1.0),
            timestamp,
        )
    }

    #[must_use]
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    #[must_use]
    pub fn seconds(&self) -> f64 {
        ticks_to_seconds(self.timestamp)
    }
}

/// Axis-aligned extent and mean position of every sample an entity owns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vector3<f64>,
    pub max: Vector3<f64>,
    pub average: Vector3<f64>,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            min: Vector3::zeros(),
            max: Vector3::zeros(),
            average: Vector3::zeros(),
        }
    }
}

impl Bounds {
    /// Degenerate bounds collapsed on a single point.
    #[must_use]
    pub fn point(position: Vector3<f64>) -> Self {
        Self {
            min: position,
            max: position,
            average: position,
        }
    }

    /// Folds positions into bounds. Returns `None` for an empty input.
    #[must_use]
    pub fn from_positions<'a>(positions: impl IntoIterator<Item = &'a Vector3<f64>>) -> Option<Self> {
        let mut min = Vector3::repeat(f64::INFINITY);
        let mut max = Vector3::repeat(f64::NEG_INFINITY);
        let mut sum = Vector3::zeros();
        let mut count = 0_usize;

        for position in positions {
            min = min.inf(position);
            max = max.sup(position);
            sum += position;
            count += 1;
        }

        if count == 0 {
            return None;
        }

        Some(Self {
            min,
            max,
            average: sum / count as f64,
        })
    }

    /// Per-axis extent, `max - min`.
    #[must_use]
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }
}
