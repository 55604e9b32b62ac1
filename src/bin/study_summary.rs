use mocap_index::api::{ImportConfig, StudyEngine};
use mocap_index::ingest::FsSourceReader;
use std::fs;
use std::path::PathBuf;

const USAGE: &str =
    "usage: study_summary --descriptor <path> [--output <path>] [--sequential] [--threads <n>] [--contract]";

#[derive(Debug)]
struct CliArgs {
    descriptor: PathBuf,
    output: Option<PathBuf>,
    config: ImportConfig,
    contract: bool,
}

fn main() {
    let _ = mocap_index::telemetry::init_default_tracing();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = parse_args()?;
    let mut engine = StudyEngine::new(FsSourceReader, args.config).map_err(|err| err.to_string())?;
    engine
        .load_study_from_path(&args.descriptor)
        .map_err(|err| err.to_string())?;

    let snapshot = engine.snapshot().map_err(|err| err.to_string())?;
    let json = if args.contract {
        snapshot.to_json_contract_v1_pretty()
    } else {
        snapshot.to_json_pretty()
    }
    .map_err(|err| err.to_string())?;

    match args.output {
        Some(path) => fs::write(&path, json)
            .map_err(|err| format!("failed to write `{}`: {err}", path.display())),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

fn parse_args() -> Result<CliArgs, String> {
    let mut args = std::env::args().skip(1);
    let mut descriptor = None::<PathBuf>;
    let mut output = None::<PathBuf>;
    let mut config = ImportConfig::default();
    let mut contract = false;

    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--descriptor" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --descriptor".to_owned())?;
                descriptor = Some(PathBuf::from(value));
            }
            "--output" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --output".to_owned())?;
                output = Some(PathBuf::from(value));
            }
            "--threads" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --threads".to_owned())?;
                let threads = value
                    .parse::<usize>()
                    .map_err(|err| format!("invalid --threads `{value}`: {err}"))?;
                config = config.with_worker_threads(threads);
            }
            "--sequential" => config = config.with_parallel_import(false),
            "--contract" => contract = true,
            "--help" | "-h" => return Err(USAGE.to_owned()),
            _ => return Err(format!("unknown argument `{flag}`")),
        }
    }

    let descriptor = descriptor.ok_or_else(|| "missing --descriptor".to_owned())?;
    Ok(CliArgs {
        descriptor,
        output,
        config,
        contract,
    })
}
