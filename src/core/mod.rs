pub mod coordinate_frame;
pub mod entity;
pub mod normalizer;
pub mod primitives;
pub mod rotation;
pub mod time_format;
pub mod time_index;
pub mod types;
pub mod units;

pub use coordinate_frame::{AxisDirection, CoordinateFrame};
pub use entity::{Cell, Entity, EntityInfo, EntityKind};
pub use normalizer::CoordinateNormalizer;
pub use primitives::{
    FieldSource, TICKS_PER_MILLISECOND, TICKS_PER_SECOND, seconds_to_ticks, ticks_to_seconds,
};
pub use rotation::{RotationFormat, direction_to_rotation, euler_to_rotation};
pub use time_format::{AdaptiveTimestampParser, TimeFormat, parse_clock};
pub use time_index::{FilteredSamples, MAX_SEARCH_ITERATIONS, index_from_timestamp};
pub use types::{Bounds, Sample, Ticks};
pub use units::LengthUnit;
