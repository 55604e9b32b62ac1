use std::path::PathBuf;

use indexmap::IndexMap;
use tracing::{debug, trace};

#[cfg(feature = "parallel-import")]
use rayon::prelude::*;

use crate::api::{ImportConfig, StudyDescriptor};
use crate::core::{CoordinateFrame, Entity, Ticks};
use crate::error::{StudyError, StudyResult};

use super::{EntityTemplate, FileImportTask, ImportBlock, SourceReader};

/// Entities produced by one completed import, ready to be published.
#[derive(Debug, Clone)]
pub struct ImportedEntities {
    pub frame: CoordinateFrame,
    pub entities: Vec<Entity>,
    pub file_count: usize,
    pub block_count: usize,
}

/// Fans file import tasks out, waits for all of them, then merges and
/// post-processes their blocks single-threaded.
pub struct ImportCoordinator<'a> {
    descriptor: &'a StudyDescriptor,
    config: &'a ImportConfig,
}

impl<'a> ImportCoordinator<'a> {
    #[must_use]
    pub fn new(descriptor: &'a StudyDescriptor, config: &'a ImportConfig) -> Self {
        Self { descriptor, config }
    }

    /// Runs the whole pipeline. Any structural failure in any task fails the
    /// import as a whole.
    pub fn run<S>(&self, source_reader: &S) -> StudyResult<ImportedEntities>
    where
        S: SourceReader + ?Sized,
    {
        let axes = &self.descriptor.axes;
        let frame = CoordinateFrame::from_tokens(&axes.x, &axes.y, &axes.z);
        let templates: Vec<EntityTemplate> = self
            .descriptor
            .entities
            .iter()
            .map(|entity| EntityTemplate::from_descriptor(self.descriptor, entity, frame))
            .collect();

        let tasks = partition_tasks(&templates, self.descriptor.delimiter as u8);
        debug!(
            study = %self.descriptor.name,
            entities = templates.len(),
            files = tasks.len(),
            "starting study import"
        );

        let results = self.execute(&tasks, source_reader)?;
        let block_count = results.iter().map(Vec::len).sum();

        let mut entities = self.build_entities(&templates);
        merge_blocks(&mut entities, results.into_iter().flatten());
        for (entity, template) in entities.iter_mut().zip(&templates) {
            entity.compute_bounds(template.static_sample().position);
        }
        normalize_timestamps(
            &mut entities,
            self.descriptor.sessions.len(),
            self.descriptor.conditions.len(),
        );

        debug!(
            study = %self.descriptor.name,
            files = tasks.len(),
            blocks = block_count,
            "study import finished"
        );
        Ok(ImportedEntities {
            frame,
            entities,
            file_count: tasks.len(),
            block_count,
        })
    }

    fn execute<S>(
        &self,
        tasks: &[FileImportTask<'_>],
        source_reader: &S,
    ) -> StudyResult<Vec<Vec<ImportBlock>>>
    where
        S: SourceReader + ?Sized,
    {
        #[cfg(feature = "parallel-import")]
        {
            if self.config.parallel_import {
                let run_all = || -> StudyResult<Vec<Vec<ImportBlock>>> {
                    let outcomes: Vec<StudyResult<Vec<ImportBlock>>> = tasks
                        .par_iter()
                        .map(|task| task.run(source_reader))
                        .collect();
                    outcomes.into_iter().collect()
                };
                return match self.config.worker_threads {
                    Some(threads) => rayon::ThreadPoolBuilder::new()
                        .num_threads(threads)
                        .build()
                        .map_err(|e| StudyError::ThreadPool(e.to_string()))?
                        .install(run_all),
                    None => run_all(),
                };
            }
        }

        #[cfg(not(feature = "parallel-import"))]
        if self.config.parallel_import {
            debug!("parallel-import feature disabled; importing files sequentially");
        }

        tasks.iter().map(|task| task.run(source_reader)).collect()
    }

    fn build_entities(&self, templates: &[EntityTemplate]) -> Vec<Entity> {
        let session_count = self.descriptor.sessions.len();
        templates
            .iter()
            .map(|template| {
                let mut entity =
                    Entity::new(template.info.clone(), session_count, &self.descriptor.conditions);
                if template.info.is_static {
                    let sample = template.static_sample();
                    for session in 0..session_count {
                        for condition in 0..self.descriptor.conditions.len() {
                            entity.set_cell(session, condition, vec![sample.clone()], 0.0);
                        }
                    }
                }
                entity
            })
            .collect()
    }
}

/// Groups every dynamic entity source by file; one task per distinct file.
fn partition_tasks(templates: &[EntityTemplate], delimiter: u8) -> Vec<FileImportTask<'_>> {
    let mut tasks: IndexMap<PathBuf, FileImportTask<'_>> = IndexMap::new();
    for template in templates.iter().filter(|template| !template.info.is_static) {
        for source in &template.sources {
            tasks
                .entry(source.path.clone())
                .or_insert_with(|| FileImportTask::new(source.path.clone(), delimiter))
                .add_reader(template, source);
        }
    }
    tasks.into_values().collect()
}

/// Installs every block into its entity's cell.
///
/// Several blocks may target the same cell; their samples are merged in
/// timestamp order and the cell keeps the largest maximum speed.
pub fn merge_blocks(entities: &mut [Entity], blocks: impl IntoIterator<Item = ImportBlock>) {
    let positions: IndexMap<i32, usize> = entities
        .iter()
        .enumerate()
        .map(|(index, entity)| (entity.id(), index))
        .collect();

    for block in blocks {
        let Some(&index) = positions.get(&block.entity_id) else {
            trace!(entity_id = block.entity_id, "dropping block for unknown entity");
            continue;
        };
        entities[index].set_cell(block.session, block.condition, block.samples, block.max_speed);
    }
}

/// Shifts every dynamic entity so that, per (session, condition), the earliest
/// first sample across entities sits at tick 0.
pub fn normalize_timestamps(entities: &mut [Entity], session_count: usize, condition_count: usize) {
    for session in 0..session_count {
        for condition in 0..condition_count {
            let origin: Option<Ticks> = entities
                .iter()
                .filter(|entity| !entity.is_static())
                .filter_map(|entity| entity.cell(session, condition)?.first_timestamp())
                .min();
            let Some(origin) = origin else {
                continue;
            };

            trace!(session, condition, origin, "normalizing timestamps");
            for entity in entities.iter_mut().filter(|entity| !entity.is_static()) {
                entity.shift_timestamps(session, condition, origin);
            }
        }
    }
}
