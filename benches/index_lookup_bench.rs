use criterion::{Criterion, criterion_group, criterion_main};
use mocap_index::api::{EntityDescriptor, ImportConfig, StudyDescriptor, StudyEngine};
use mocap_index::core::{Sample, index_from_timestamp};
use mocap_index::ingest::MemorySourceReader;
use nalgebra::Vector3;
use std::fmt::Write;
use std::hint::black_box;

fn bench_index_lookup_1m(c: &mut Criterion) {
    let samples: Vec<Sample> = (0..1_000_000_i64)
        .map(|i| Sample::at(Vector3::new(i as f64 * 0.001, 0.0, 0.0), i * 83_333))
        .collect();
    let target = samples[654_321].timestamp + 10;

    c.bench_function("index_lookup_1m", |b| {
        b.iter(|| index_from_timestamp(black_box(&samples), black_box(target), black_box(0)))
    });

    c.bench_function("index_lookup_1m_resume", |b| {
        b.iter(|| {
            index_from_timestamp(black_box(&samples), black_box(target), black_box(650_000))
        })
    });
}

fn build_study(files: usize, rows: usize) -> (StudyDescriptor, MemorySourceReader) {
    let sessions: Vec<String> = (0..files).map(|s| format!("s{s}")).collect();
    let mut descriptor =
        StudyDescriptor::new("bench", sessions, vec!["baseline".to_owned()]).with_axes(
            "right", "up", "forward",
        );
    let mut source = MemorySourceReader::new();

    for file in 0..files {
        let path = format!("session_{file}.csv");
        let mut contents = String::from("t,x,y,z,qw,qx,qy,qz\n");
        for row in 0..rows {
            let _ = writeln!(
                contents,
                "{:.4},{},{},{},1,0,0,0",
                row as f64 / 120.0,
                row as f64 * 0.01,
                (row % 7) as f64,
                file as f64
            );
        }
        source.insert(path.clone(), contents);
        descriptor = descriptor.with_entity(
            EntityDescriptor::new(file as i32, format!("tracker {file}"))
                .with_timestamp("t")
                .with_position("x", "y", "z")
                .with_rotation("quaternion", &["qw", "qx", "qy", "qz"])
                .with_source(path, file, "baseline"),
        );
    }
    (descriptor, source)
}

fn bench_import_8_files(c: &mut Criterion) {
    let (descriptor, source) = build_study(8, 5_000);
    let mut engine = StudyEngine::new(source, ImportConfig::default()).expect("engine init");

    c.bench_function("import_8_files_5k_rows", |b| {
        b.iter(|| {
            let _ = engine
                .load_study(black_box(&descriptor))
                .expect("import should succeed");
        })
    });
}

criterion_group!(benches, bench_index_lookup_1m, bench_import_8_files);
criterion_main!(benches);
