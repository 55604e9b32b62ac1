use std::path::PathBuf;

use nalgebra::Vector3;
use smallvec::SmallVec;
use tracing::warn;

use crate::api::{EntityDescriptor, StudyDescriptor};
use crate::core::{
    CoordinateFrame, CoordinateNormalizer, EntityInfo, FieldSource, LengthUnit, RotationFormat,
    Sample, TimeFormat,
};

/// One declared file feeding one cell of an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    pub path: PathBuf,
    pub session: usize,
    pub condition: usize,
    pub condition_filter: String,
    pub session_filter: String,
}

/// Immutable per-entity configuration shared by every import task.
///
/// Built before any task starts and never mutated while tasks run.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityTemplate {
    pub info: EntityInfo,
    pub normalizer: CoordinateNormalizer,
    pub timestamp: FieldSource,
    pub position: [FieldSource; 3],
    pub rotation: SmallVec<[FieldSource; 4]>,
    pub scale: [FieldSource; 3],
    pub state: Option<String>,
    pub condition_filter_column: Option<String>,
    pub session_filter_column: Option<String>,
    /// Literal position in the authored frame and unit.
    pub default_position: Vector3<f64>,
    /// Literal rotation components in the authored convention.
    pub default_rotation: [f64; 4],
    pub default_scale: Vector3<f64>,
    pub sources: Vec<ResolvedSource>,
}

impl EntityTemplate {
    /// Resolves an entity descriptor against its study.
    ///
    /// Unknown convention tokens and malformed literals are recovered with
    /// defaults and logged.
    #[must_use]
    pub fn from_descriptor(
        study: &StudyDescriptor,
        entity: &EntityDescriptor,
        frame: CoordinateFrame,
    ) -> Self {
        let unit = LengthUnit::from_token(&entity.unit).unwrap_or_else(|| {
            warn!(entity_id = entity.id, token = %entity.unit, "unrecognized unit; using meters");
            LengthUnit::default()
        });
        let rotation_format = resolve_rotation_format(entity);
        let time_format = TimeFormat::from_token(&entity.time_format).unwrap_or_else(|| {
            warn!(
                entity_id = entity.id,
                token = %entity.time_format,
                "unrecognized time format; using seconds"
            );
            TimeFormat::default()
        });

        let timestamp = entity
            .timestamp
            .as_deref()
            .map_or(FieldSource::Absent, |token| field(entity.id, "timestamp", token));
        let position = [
            field(entity.id, "position.x", &entity.position[0]),
            field(entity.id, "position.y", &entity.position[1]),
            field(entity.id, "position.z", &entity.position[2]),
        ];
        let rotation: SmallVec<[FieldSource; 4]> = entity
            .rotation
            .iter()
            .take(4)
            .map(|token| field(entity.id, "rotation", token))
            .collect();
        let scale = [
            field(entity.id, "scale.x", &entity.scale[0]),
            field(entity.id, "scale.y", &entity.scale[1]),
            field(entity.id, "scale.z", &entity.scale[2]),
        ];

        let default_position = Vector3::new(
            position[0].literal_or(0.0),
            position[1].literal_or(0.0),
            position[2].literal_or(0.0),
        );
        let identity = rotation_format.identity_components();
        let mut default_rotation = identity;
        for (component, source) in rotation.iter().enumerate() {
            default_rotation[component] = source.literal_or(identity[component]);
        }
        let default_scale = Vector3::new(
            scale[0].literal_or(1.0),
            scale[1].literal_or(1.0),
            scale[2].literal_or(1.0),
        );

        let sources = entity
            .sources
            .iter()
            .filter_map(|source| {
                let condition = study
                    .conditions
                    .iter()
                    .position(|name| name == &source.condition)?;
                let session_name = study.sessions.get(source.session)?;
                Some(ResolvedSource {
                    path: study.resolve_path(&source.file),
                    session: source.session,
                    condition,
                    condition_filter: source
                        .condition_filter
                        .clone()
                        .unwrap_or_else(|| source.condition.clone()),
                    session_filter: source
                        .session_filter
                        .clone()
                        .unwrap_or_else(|| session_name.clone()),
                })
            })
            .collect();

        Self {
            info: EntityInfo {
                id: entity.id,
                title: entity.title.clone(),
                kind: entity.kind,
                parent_id: entity.parent_id,
                is_static: entity.is_static,
                rotation_format,
                time_format,
                unit,
                color: entity.color,
                mesh: entity.mesh.clone(),
            },
            normalizer: CoordinateNormalizer::new(frame, unit.meters_per_unit(), rotation_format),
            timestamp,
            position,
            rotation,
            scale,
            state: entity.state.clone(),
            condition_filter_column: entity.condition_filter_column.clone(),
            session_filter_column: entity.session_filter_column.clone(),
            default_position,
            default_rotation,
            default_scale,
            sources,
        }
    }

    /// Un-normalized starting point for every parsed row.
    #[must_use]
    pub fn raw_defaults(&self) -> RawSample {
        RawSample {
            position: self.default_position,
            rotation: self.default_rotation,
            scale: self.default_scale,
            timestamp: 0,
            state: None,
        }
    }

    /// The entity's literal transform in the canonical frame, at timestamp 0.
    #[must_use]
    pub fn static_sample(&self) -> Sample {
        self.raw_defaults().normalize(&self.normalizer)
    }
}

/// Row values in the authored frame before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSample {
    pub position: Vector3<f64>,
    pub rotation: [f64; 4],
    pub scale: Vector3<f64>,
    pub timestamp: i64,
    pub state: Option<String>,
}

impl RawSample {
    #[must_use]
    pub fn normalize(self, normalizer: &CoordinateNormalizer) -> Sample {
        let mut sample = Sample::new(
            normalizer.position(&self.position),
            normalizer.rotation(self.rotation),
            self.scale,
            self.timestamp,
        );
        sample.state = self.state;
        sample
    }
}

fn resolve_rotation_format(entity: &EntityDescriptor) -> RotationFormat {
    RotationFormat::from_token(&entity.rotation_format).unwrap_or_else(|| {
        let fallback = if entity.rotation.len() == 3 {
            RotationFormat::EulerDegrees
        } else {
            RotationFormat::Quaternion
        };
        warn!(
            entity_id = entity.id,
            token = %entity.rotation_format,
            ?fallback,
            "unrecognized rotation format"
        );
        fallback
    })
}

fn field(entity_id: i32, role: &'static str, token: &str) -> FieldSource {
    FieldSource::parse(token).unwrap_or_else(|contents| {
        warn!(entity_id, role, contents = %contents, "malformed literal; using role default");
        FieldSource::Absent
    })
}
