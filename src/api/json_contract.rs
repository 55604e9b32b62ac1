use serde::{Deserialize, Serialize};

use crate::error::{StudyError, StudyResult};

use super::{StudyDescriptor, StudySnapshot};

pub const STUDY_DESCRIPTOR_JSON_SCHEMA_V1: u32 = 1;
pub const STUDY_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyDescriptorJsonContractV1 {
    pub schema_version: u32,
    pub descriptor: StudyDescriptor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudySnapshotJsonContractV1 {
    pub schema_version: u32,
    pub snapshot: StudySnapshot,
}

impl StudyDescriptor {
    pub fn to_json_contract_v1_pretty(&self) -> StudyResult<String> {
        let payload = StudyDescriptorJsonContractV1 {
            schema_version: STUDY_DESCRIPTOR_JSON_SCHEMA_V1,
            descriptor: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            StudyError::Serialization(format!("failed to serialize descriptor contract v1: {e}"))
        })
    }

    /// Accepts either a bare descriptor document or a versioned contract.
    pub fn from_json_compat_str(input: &str) -> StudyResult<Self> {
        if let Ok(descriptor) = serde_json::from_str::<StudyDescriptor>(input) {
            return Ok(descriptor);
        }
        let payload: StudyDescriptorJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            StudyError::InvalidDescriptor(format!("failed to parse descriptor json payload: {e}"))
        })?;
        if payload.schema_version != STUDY_DESCRIPTOR_JSON_SCHEMA_V1 {
            return Err(StudyError::InvalidDescriptor(format!(
                "unsupported descriptor schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.descriptor)
    }
}

impl StudySnapshot {
    pub fn to_json_pretty(&self) -> StudyResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StudyError::Serialization(format!("failed to serialize snapshot: {e}")))
    }

    pub fn to_json_contract_v1_pretty(&self) -> StudyResult<String> {
        let payload = StudySnapshotJsonContractV1 {
            schema_version: STUDY_SNAPSHOT_JSON_SCHEMA_V1,
            snapshot: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            StudyError::Serialization(format!("failed to serialize snapshot contract v1: {e}"))
        })
    }
}
