mod descriptor;
mod engine;
mod engine_config;
mod json_contract;
mod query;
mod snapshot;
mod study;
mod validation;

pub use descriptor::{AxisDescriptor, EntityDescriptor, SourceDescriptor, StudyDescriptor};
pub use engine::StudyEngine;
pub use engine_config::ImportConfig;
pub use json_contract::{
    STUDY_DESCRIPTOR_JSON_SCHEMA_V1, STUDY_SNAPSHOT_JSON_SCHEMA_V1, StudyDescriptorJsonContractV1,
    StudySnapshotJsonContractV1,
};
pub use snapshot::{CellSnapshot, EntitySnapshot, StudySnapshot};
pub use study::Study;
