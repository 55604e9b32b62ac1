use serde::{Deserialize, Serialize};

/// Length unit positions are recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthUnit {
    Millimeters,
    Centimeters,
    #[default]
    Meters,
}

impl LengthUnit {
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "mm" | "millimeter" | "millimeters" => Some(Self::Millimeters),
            "cm" | "centimeter" | "centimeters" => Some(Self::Centimeters),
            "m" | "meter" | "meters" => Some(Self::Meters),
            _ => None,
        }
    }

    #[must_use]
    pub fn meters_per_unit(self) -> f64 {
        match self {
            Self::Millimeters => 0.001,
            Self::Centimeters => 0.01,
            Self::Meters => 1.0,
        }
    }
}
