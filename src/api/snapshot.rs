use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::core::{Bounds, EntityKind, Ticks};
use crate::error::StudyResult;
use crate::ingest::SourceReader;

use super::{Study, StudyEngine};

/// Serializable summary of a loaded study used by regression tests and
/// inspection tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudySnapshot {
    pub name: String,
    pub generation: u64,
    pub sessions: Vec<String>,
    pub conditions: Vec<String>,
    pub entities: Vec<EntitySnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: i32,
    pub title: String,
    pub kind: EntityKind,
    pub parent_id: i32,
    pub is_static: bool,
    pub bounds: Bounds,
    pub extent: Vector3<f64>,
    pub cells: Vec<CellSnapshot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub session: usize,
    pub condition: usize,
    pub sample_count: usize,
    pub min_timestamp: Ticks,
    pub max_timestamp: Ticks,
    pub max_speed: f64,
}

impl Study {
    /// Builds a deterministic snapshot; empty cells are omitted.
    #[must_use]
    pub fn snapshot(&self) -> StudySnapshot {
        let entities = self
            .entities()
            .iter()
            .map(|entity| EntitySnapshot {
                id: entity.id(),
                title: entity.title().to_owned(),
                kind: entity.info().kind,
                parent_id: entity.parent_id(),
                is_static: entity.is_static(),
                bounds: entity.bounds(),
                extent: entity.bounds().size(),
                cells: entity
                    .cells()
                    .filter(|(_, _, cell)| !cell.is_empty())
                    .map(|(session, condition, cell)| CellSnapshot {
                        session,
                        condition,
                        sample_count: cell.samples().len(),
                        min_timestamp: cell.first_timestamp().unwrap_or(0),
                        max_timestamp: cell.last_timestamp().unwrap_or(0),
                        max_speed: cell.max_speed(),
                    })
                    .collect(),
            })
            .collect();

        StudySnapshot {
            name: self.name().to_owned(),
            generation: self.generation(),
            sessions: self.session_names().to_vec(),
            conditions: self.condition_names().to_vec(),
            entities,
        }
    }
}

impl<S: SourceReader> StudyEngine<S> {
    pub fn snapshot(&self) -> StudyResult<StudySnapshot> {
        Ok(self.current()?.snapshot())
    }

    /// Serializes the snapshot as pretty JSON.
    pub fn snapshot_json_pretty(&self) -> StudyResult<String> {
        self.snapshot()?.to_json_pretty()
    }
}
