use mocap_index::api::{EntityDescriptor, StudyDescriptor};
use mocap_index::core::CoordinateFrame;
use mocap_index::ingest::{EntityTemplate, FileImportTask, MemorySourceReader, ParseStep, SampleParser, map_columns};
use nalgebra::Vector3;

fn study() -> StudyDescriptor {
    StudyDescriptor::new("mapping", vec!["s0".to_owned()], vec!["c0".to_owned()])
}

fn template(entity: EntityDescriptor) -> EntityTemplate {
    EntityTemplate::from_descriptor(&study(), &entity, CoordinateFrame::identity())
}

#[test]
fn last_matching_column_wins() {
    let tracker = template(
        EntityDescriptor::new(1, "tracker")
            .with_timestamp("t")
            .with_position("x", "y", "z"),
    );
    let mappings = map_columns(["t", "x", "y", "z", "x"], &[&tracker]);

    assert_eq!(mappings[0].timestamp, Some(0));
    assert_eq!(mappings[0].position, [Some(4), Some(2), Some(3)]);
}

#[test]
fn roles_without_columns_stay_unmapped() {
    let tracker = template(
        EntityDescriptor::new(1, "tracker")
            .with_timestamp("t")
            .with_position("x", "{2}", "z")
            .with_state("label"),
    );
    let mappings = map_columns(["t", "x", "unrelated"], &[&tracker]);
    let mapping = mappings[0];

    assert_eq!(mapping.position, [Some(1), None, None]);
    assert_eq!(mapping.rotation, [None; 4]);
    assert_eq!(mapping.scale, [None; 3]);
    assert_eq!(mapping.state, None);
    assert_eq!(mapping.resolved_count(), 2);
}

#[test]
fn entities_sharing_a_file_get_independent_mappings() {
    let left = template(
        EntityDescriptor::new(1, "left")
            .with_timestamp("time")
            .with_position("lx", "ly", "lz"),
    );
    let right = template(
        EntityDescriptor::new(2, "right")
            .with_timestamp("time")
            .with_position("rx", "ry", "rz"),
    );
    let header = ["time", "lx", "ly", "lz", "rx", "ry", "rz"];
    let mappings = map_columns(header, &[&left, &right]);

    assert_eq!(mappings[0].position, [Some(1), Some(2), Some(3)]);
    assert_eq!(mappings[1].position, [Some(4), Some(5), Some(6)]);
    assert_eq!(mappings[0].timestamp, mappings[1].timestamp);
}

#[test]
fn header_names_are_trimmed() {
    let tracker = template(EntityDescriptor::new(1, "tracker").with_timestamp("t"));
    let mappings = map_columns([" t "], &[&tracker]);
    assert_eq!(mappings[0].timestamp, Some(0));
}

#[test]
fn parse_steps_follow_resolved_roles() {
    let entity = EntityDescriptor::new(1, "tracker")
        .with_timestamp("t")
        .with_position("x", "y", "{0}")
        .with_rotation("quaternion", &["qw", "qx", "qy", "qz"])
        .with_source("a.csv", 0, "c0");
    let tracker = template(entity);
    let mapping = map_columns(["t", "x", "y", "qw", "qz"], &[&tracker])[0];
    let parser = SampleParser::new(&tracker, &mapping, &tracker.sources[0]);

    assert_eq!(
        parser.steps(),
        &[
            ParseStep::Timestamp { column: 0 },
            ParseStep::Position { axis: 0, column: 1 },
            ParseStep::Position { axis: 1, column: 2 },
            ParseStep::Rotation { component: 0, column: 3 },
            ParseStep::Rotation { component: 3, column: 4 },
        ]
    );
}

#[test]
fn file_task_emits_one_sorted_block_per_reader() {
    let descriptor = study()
        .with_entity(
            EntityDescriptor::new(1, "left")
                .with_timestamp("t")
                .with_position("lx", "{0}", "{0}")
                .with_source("pair.csv", 0, "c0"),
        )
        .with_entity(
            EntityDescriptor::new(2, "right")
                .with_timestamp("t")
                .with_position("rx", "{0}", "{0}")
                .with_source("pair.csv", 0, "c0"),
        );
    let frame = CoordinateFrame::identity();
    let templates: Vec<EntityTemplate> = descriptor
        .entities
        .iter()
        .map(|entity| EntityTemplate::from_descriptor(&descriptor, entity, frame))
        .collect();

    let mut task = FileImportTask::new("pair.csv", b',');
    for template in &templates {
        task.add_reader(template, &template.sources[0]);
    }
    assert_eq!(task.reader_count(), 2);

    let source = MemorySourceReader::new().with_file("pair.csv", "t,lx,rx\n2,1,5\n1,0,4\n");
    let blocks = task.run(&source).expect("task should succeed");

    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].entity_id, 1);
    assert_eq!(blocks[1].entity_id, 2);
    assert_eq!(blocks[0].samples[0].timestamp, 10_000_000);
    assert_eq!(blocks[0].samples[0].position, Vector3::new(0.0, 0.0, 0.0));
    assert_eq!(blocks[1].samples[1].position, Vector3::new(5.0, 0.0, 0.0));
    assert_eq!(blocks[0].max_speed, 1.0);
}
