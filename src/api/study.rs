use indexmap::IndexMap;

use crate::core::{Bounds, CoordinateFrame, Entity, FilteredSamples, Sample, Ticks};
use crate::error::{StudyError, StudyResult};

/// Immutable result of one successful study load.
///
/// Safe to share across reader threads; a new load produces a new `Study`
/// instead of mutating this one.
#[derive(Debug, Clone)]
pub struct Study {
    name: String,
    generation: u64,
    frame: CoordinateFrame,
    session_names: Vec<String>,
    condition_names: Vec<String>,
    entities: Vec<Entity>,
    positions: IndexMap<i32, usize>,
}

impl Study {
    pub(crate) fn new(
        name: String,
        generation: u64,
        frame: CoordinateFrame,
        session_names: Vec<String>,
        condition_names: Vec<String>,
        entities: Vec<Entity>,
    ) -> Self {
        let positions = entities
            .iter()
            .enumerate()
            .map(|(index, entity)| (entity.id(), index))
            .collect();
        Self {
            name,
            generation,
            frame,
            session_names,
            condition_names,
            entities,
            positions,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Load counter of the engine that produced this study.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn frame(&self) -> CoordinateFrame {
        self.frame
    }

    #[must_use]
    pub fn session_names(&self) -> &[String] {
        &self.session_names
    }

    #[must_use]
    pub fn condition_names(&self) -> &[String] {
        &self.condition_names
    }

    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity_ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.positions.keys().copied()
    }

    #[must_use]
    pub fn entity(&self, entity_id: i32) -> Option<&Entity> {
        self.positions
            .get(&entity_id)
            .map(|&index| &self.entities[index])
    }

    fn require(&self, entity_id: i32) -> StudyResult<&Entity> {
        self.entity(entity_id)
            .ok_or(StudyError::UnknownEntity(entity_id))
    }

    /// Entities whose parent is `entity_id`.
    pub fn children_of(&self, entity_id: i32) -> impl Iterator<Item = &Entity> + '_ {
        self.entities
            .iter()
            .filter(move |entity| entity.parent_id() == entity_id)
    }

    #[must_use]
    pub fn condition_id(&self, name: &str) -> Option<usize> {
        self.condition_names.iter().position(|condition| condition == name)
    }

    #[must_use]
    pub fn condition_name(&self, condition: usize) -> Option<&str> {
        self.condition_names.get(condition).map(String::as_str)
    }

    /// Timestamp-ordered samples of a cell; empty for out-of-range cells.
    pub fn samples(&self, entity_id: i32, session: usize, condition: usize) -> StudyResult<&[Sample]> {
        Ok(self.require(entity_id)?.samples(session, condition))
    }

    /// Lazy consecutive-pair filtered view over `first_index..=last_index`.
    pub fn filtered_samples<P>(
        &self,
        entity_id: i32,
        session: usize,
        condition: usize,
        first_index: usize,
        last_index: usize,
        predicate: P,
    ) -> StudyResult<FilteredSamples<'_, P>>
    where
        P: FnMut(&Sample, &Sample) -> bool,
    {
        Ok(self.require(entity_id)?.filtered_samples(
            session,
            condition,
            first_index,
            last_index,
            predicate,
        ))
    }

    pub fn index_from_timestamp(
        &self,
        entity_id: i32,
        timestamp: Ticks,
        session: usize,
        condition: usize,
        start_index: usize,
    ) -> StudyResult<usize> {
        Ok(self
            .require(entity_id)?
            .index_from_timestamp(timestamp, session, condition, start_index))
    }

    pub fn min_timestamp(&self, entity_id: i32, session: usize, condition: usize) -> StudyResult<Ticks> {
        Ok(self.require(entity_id)?.min_timestamp(session, condition))
    }

    pub fn max_timestamp(&self, entity_id: i32, session: usize, condition: usize) -> StudyResult<Ticks> {
        Ok(self.require(entity_id)?.max_timestamp(session, condition))
    }

    /// Span between the first and last sample of a cell.
    pub fn duration_ticks(&self, entity_id: i32, session: usize, condition: usize) -> StudyResult<Ticks> {
        let entity = self.require(entity_id)?;
        Ok(entity
            .max_timestamp(session, condition)
            .saturating_sub(entity.min_timestamp(session, condition)))
    }

    pub fn sample_count(&self, entity_id: i32, session: usize, condition: usize) -> StudyResult<usize> {
        Ok(self.require(entity_id)?.samples(session, condition).len())
    }

    pub fn cell_max_speed(&self, entity_id: i32, session: usize, condition: usize) -> StudyResult<f64> {
        Ok(self.require(entity_id)?.max_speed(session, condition))
    }

    pub fn bounds(&self, entity_id: i32) -> StudyResult<Bounds> {
        Ok(self.require(entity_id)?.bounds())
    }
}
