use std::collections::HashSet;

use crate::core::RotationFormat;
use crate::error::{StudyError, StudyResult};

use super::{EntityDescriptor, StudyDescriptor};

/// Rejects descriptors the import pipeline cannot build a full entity set from.
///
/// Only structural problems fail here; unknown convention tokens are
/// recovered later with documented defaults.
pub(crate) fn validate_study_descriptor(descriptor: &StudyDescriptor) -> StudyResult<()> {
    if descriptor.sessions.is_empty() {
        return Err(StudyError::InvalidDescriptor(
            "study must declare at least one session".to_owned(),
        ));
    }
    if descriptor.conditions.is_empty() {
        return Err(StudyError::InvalidDescriptor(
            "study must declare at least one condition".to_owned(),
        ));
    }
    if !descriptor.delimiter.is_ascii() {
        return Err(StudyError::InvalidDescriptor(format!(
            "delimiter must be a single ascii character, got {:?}",
            descriptor.delimiter
        )));
    }

    let mut condition_names = HashSet::new();
    for condition in &descriptor.conditions {
        if !condition_names.insert(condition.as_str()) {
            return Err(StudyError::InvalidDescriptor(format!(
                "duplicate condition name `{condition}`"
            )));
        }
    }

    let mut ids = HashSet::new();
    for entity in &descriptor.entities {
        if !ids.insert(entity.id) {
            return Err(StudyError::InvalidDescriptor(format!(
                "duplicate entity id {}",
                entity.id
            )));
        }
        validate_entity_descriptor(descriptor, entity)?;
    }

    Ok(())
}

fn validate_entity_descriptor(
    descriptor: &StudyDescriptor,
    entity: &EntityDescriptor,
) -> StudyResult<()> {
    let component_count = entity.rotation.len();
    if component_count != 3 && component_count != 4 {
        return Err(StudyError::InvalidDescriptor(format!(
            "entity {} must declare 3 or 4 rotation fields, got {component_count}",
            entity.id
        )));
    }
    if let Some(format) = RotationFormat::from_token(&entity.rotation_format) {
        if format.component_count() != component_count {
            return Err(StudyError::InvalidDescriptor(format!(
                "entity {} rotation format `{}` expects {} fields, got {component_count}",
                entity.id,
                entity.rotation_format,
                format.component_count()
            )));
        }
    }

    if entity.is_static {
        return Ok(());
    }

    if entity.sources.is_empty() {
        return Err(StudyError::InvalidDescriptor(format!(
            "dynamic entity {} declares no data source",
            entity.id
        )));
    }
    for source in &entity.sources {
        if source.session >= descriptor.sessions.len() {
            return Err(StudyError::InvalidDescriptor(format!(
                "entity {} source `{}` references session {} but the study has {}",
                entity.id,
                source.file.display(),
                source.session,
                descriptor.sessions.len()
            )));
        }
        if !descriptor.conditions.contains(&source.condition) {
            return Err(StudyError::InvalidDescriptor(format!(
                "entity {} source `{}` references unknown condition `{}`",
                entity.id,
                source.file.display(),
                source.condition
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::validate_study_descriptor;
    use crate::api::{EntityDescriptor, StudyDescriptor};

    fn study() -> StudyDescriptor {
        StudyDescriptor::new("s", vec!["s0".to_owned()], vec!["c0".to_owned()])
    }

    #[test]
    fn duplicate_entity_ids_are_rejected() {
        let descriptor = study()
            .with_entity(EntityDescriptor::new(1, "a").with_static(true))
            .with_entity(EntityDescriptor::new(1, "b").with_static(true));
        let err = validate_study_descriptor(&descriptor).expect_err("duplicate id must fail");
        assert!(format!("{err}").contains("duplicate entity id"));
    }

    #[test]
    fn unknown_condition_is_rejected() {
        let descriptor =
            study().with_entity(EntityDescriptor::new(1, "a").with_source("a.csv", 0, "nope"));
        let err = validate_study_descriptor(&descriptor).expect_err("unknown condition must fail");
        assert!(format!("{err}").contains("unknown condition"));
    }

    #[test]
    fn session_out_of_range_is_rejected() {
        let descriptor =
            study().with_entity(EntityDescriptor::new(1, "a").with_source("a.csv", 3, "c0"));
        let err = validate_study_descriptor(&descriptor).expect_err("session must fail");
        assert!(format!("{err}").contains("session 3"));
    }

    #[test]
    fn rotation_field_count_must_match_format() {
        let descriptor = study().with_entity(
            EntityDescriptor::new(1, "a")
                .with_static(true)
                .with_rotation("euler_degrees", &["rx", "ry", "rz", "rw"]),
        );
        let err = validate_study_descriptor(&descriptor).expect_err("field count must fail");
        assert!(format!("{err}").contains("expects 3 fields"));
    }

    #[test]
    fn dynamic_entity_without_source_is_rejected() {
        let descriptor = study().with_entity(EntityDescriptor::new(1, "a"));
        let err = validate_study_descriptor(&descriptor).expect_err("missing source must fail");
        assert!(format!("{err}").contains("no data source"));
    }
}
