use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::time_index::{FilteredSamples, index_from_timestamp};
use crate::core::{Bounds, LengthUnit, RotationFormat, Sample, Ticks, TimeFormat};

/// What an entity represents in the recorded study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Person,
    Device,
    Touch,
    #[default]
    Prop,
}

/// One (session, condition) slot of an entity's data grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    samples: Vec<Sample>,
    max_speed: f64,
}

impl Cell {
    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    #[must_use]
    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn first_timestamp(&self) -> Option<Ticks> {
        self.samples.first().map(|sample| sample.timestamp)
    }

    #[must_use]
    pub fn last_timestamp(&self) -> Option<Ticks> {
        self.samples.last().map(|sample| sample.timestamp)
    }
}

/// Identity and presentation attributes of an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityInfo {
    pub id: i32,
    pub title: String,
    pub kind: EntityKind,
    pub parent_id: i32,
    pub is_static: bool,
    pub rotation_format: RotationFormat,
    pub time_format: TimeFormat,
    pub unit: LengthUnit,
    pub color: [f32; 4],
    pub mesh: Option<String>,
}

/// A tracked object with one timestamp-sorted sample sequence per
/// (session, condition) cell.
///
/// The grid dimensions are fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    info: EntityInfo,
    conditions: IndexMap<String, usize>,
    session_count: usize,
    cells: Vec<Cell>,
    bounds: Bounds,
}

impl Entity {
    /// Creates an entity with an empty `sessions x conditions` grid.
    #[must_use]
    pub fn new(info: EntityInfo, session_count: usize, condition_names: &[String]) -> Self {
        let conditions: IndexMap<String, usize> = condition_names
            .iter()
            .enumerate()
            .map(|(id, name)| (name.clone(), id))
            .collect();
        let cells = vec![Cell::default(); session_count * conditions.len()];
        Self {
            info,
            conditions,
            session_count,
            cells,
            bounds: Bounds::default(),
        }
    }

    #[must_use]
    pub fn info(&self) -> &EntityInfo {
        &self.info
    }

    #[must_use]
    pub fn id(&self) -> i32 {
        self.info.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.info.title
    }

    #[must_use]
    pub fn parent_id(&self) -> i32 {
        self.info.parent_id
    }

    #[must_use]
    pub fn is_static(&self) -> bool {
        self.info.is_static
    }

    #[must_use]
    pub fn session_count(&self) -> usize {
        self.session_count
    }

    #[must_use]
    pub fn condition_count(&self) -> usize {
        self.conditions.len()
    }

    #[must_use]
    pub fn condition_id(&self, name: &str) -> Option<usize> {
        self.conditions.get(name).copied()
    }

    #[must_use]
    pub fn condition_name(&self, id: usize) -> Option<&str> {
        self.conditions.get_index(id).map(|(name, _)| name.as_str())
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn cell_index(&self, session: usize, condition: usize) -> Option<usize> {
        (session < self.session_count && condition < self.conditions.len())
            .then(|| session * self.conditions.len() + condition)
    }

    #[must_use]
    pub fn cell(&self, session: usize, condition: usize) -> Option<&Cell> {
        self.cell_index(session, condition)
            .map(|index| &self.cells[index])
    }

    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, &Cell)> {
        let condition_count = self.conditions.len();
        self.cells.iter().enumerate().map(move |(index, cell)| {
            (index / condition_count, index % condition_count, cell)
        })
    }

    /// Samples of a cell; empty for out-of-range coordinates.
    #[must_use]
    pub fn samples(&self, session: usize, condition: usize) -> &[Sample] {
        self.cell(session, condition)
            .map_or(&[][..], Cell::samples)
    }

    /// Installs samples into a cell.
    ///
    /// An empty cell takes the samples as-is; an occupied cell receives a
    /// stable timestamp merge so the sequence stays sorted. The cell's maximum
    /// speed becomes `max(existing, max_speed)`. Returns `false` when the
    /// coordinates are outside the grid.
    pub fn set_cell(
        &mut self,
        session: usize,
        condition: usize,
        samples: Vec<Sample>,
        max_speed: f64,
    ) -> bool {
        let Some(index) = self.cell_index(session, condition) else {
            return false;
        };
        let cell = &mut self.cells[index];

        if cell.samples.is_empty() {
            cell.samples = samples;
        } else {
            let existing = std::mem::take(&mut cell.samples);
            cell.samples = merge_sorted(existing, samples);
        }
        if max_speed > cell.max_speed {
            cell.max_speed = max_speed;
        }
        trace!(
            entity_id = self.info.id,
            session,
            condition,
            count = cell.samples.len(),
            max_speed = cell.max_speed,
            "set cell"
        );
        true
    }

    /// Subtracts `origin` from every timestamp of a cell, saturating at the
    /// tick range.
    pub fn shift_timestamps(&mut self, session: usize, condition: usize, origin: Ticks) {
        if let Some(index) = self.cell_index(session, condition) {
            for sample in &mut self.cells[index].samples {
                sample.timestamp = sample.timestamp.saturating_sub(origin);
            }
        }
    }

    /// Recomputes aggregate bounds.
    ///
    /// Static entities collapse onto `static_position`; dynamic entities scan
    /// every sample of every cell.
    pub fn compute_bounds(&mut self, static_position: nalgebra::Vector3<f64>) {
        self.bounds = if self.info.is_static {
            Bounds::point(static_position)
        } else {
            Bounds::from_positions(
                self.cells
                    .iter()
                    .flat_map(|cell| cell.samples.iter().map(|sample| &sample.position)),
            )
            .unwrap_or_default()
        };
    }

    /// Index of the sample at or just before `timestamp` (see [`index_from_timestamp`]).
    ///
    /// Static entities always answer `0`, as do out-of-range cells.
    #[must_use]
    pub fn index_from_timestamp(
        &self,
        timestamp: Ticks,
        session: usize,
        condition: usize,
        start_index: usize,
    ) -> usize {
        if self.info.is_static {
            return 0;
        }
        index_from_timestamp(self.samples(session, condition), timestamp, start_index)
    }

    /// First timestamp of a cell, `0` when absent.
    #[must_use]
    pub fn min_timestamp(&self, session: usize, condition: usize) -> Ticks {
        self.cell(session, condition)
            .and_then(Cell::first_timestamp)
            .unwrap_or(0)
    }

    /// Last timestamp of a cell, `0` when absent.
    #[must_use]
    pub fn max_timestamp(&self, session: usize, condition: usize) -> Ticks {
        self.cell(session, condition)
            .and_then(Cell::last_timestamp)
            .unwrap_or(0)
    }

    #[must_use]
    pub fn max_speed(&self, session: usize, condition: usize) -> f64 {
        self.cell(session, condition)
            .map_or(0.0, Cell::max_speed)
    }

    pub fn filtered_samples<P>(
        &self,
        session: usize,
        condition: usize,
        first_index: usize,
        last_index: usize,
        predicate: P,
    ) -> FilteredSamples<'_, P>
    where
        P: FnMut(&Sample, &Sample) -> bool,
    {
        FilteredSamples::new(
            self.samples(session, condition),
            first_index,
            last_index,
            predicate,
        )
    }
}

fn merge_sorted(left: Vec<Sample>, right: Vec<Sample>) -> Vec<Sample> {
    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        let take_left = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => l.timestamp <= r.timestamp,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        let next = if take_left { left.next() } else { right.next() };
        merged.extend(next);
    }
    merged
}
