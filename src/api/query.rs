use crate::core::{Entity, FilteredSamples, Sample, Ticks};
use crate::error::StudyResult;
use crate::ingest::SourceReader;

use super::StudyEngine;

/// Read-only query surface over the published study.
///
/// Every call fails with `NoStudyLoaded` before the first successful load and
/// with `UnknownEntity` for undeclared ids. Out-of-range session/condition
/// coordinates are not errors: they read as empty cells.
impl<S: SourceReader> StudyEngine<S> {
    pub fn entity(&self, entity_id: i32) -> StudyResult<Option<&Entity>> {
        Ok(self.current()?.entity(entity_id))
    }

    pub fn samples(&self, entity_id: i32, session: usize, condition: usize) -> StudyResult<&[Sample]> {
        self.current()?.samples(entity_id, session, condition)
    }

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
        self.current()?.filtered_samples(
            entity_id,
            session,
            condition,
            first_index,
            last_index,
            predicate,
        )
    }

    pub fn index_from_timestamp(
        &self,
        entity_id: i32,
        timestamp: Ticks,
        session: usize,
        condition: usize,
        start_index: usize,
    ) -> StudyResult<usize> {
        self.current()?
            .index_from_timestamp(entity_id, timestamp, session, condition, start_index)
    }

    pub fn min_timestamp(&self, entity_id: i32, session: usize, condition: usize) -> StudyResult<Ticks> {
        self.current()?.min_timestamp(entity_id, session, condition)
    }

    pub fn max_timestamp(&self, entity_id: i32, session: usize, condition: usize) -> StudyResult<Ticks> {
        self.current()?.max_timestamp(entity_id, session, condition)
    }
}
