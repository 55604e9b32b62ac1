use mocap_index::api::{EntityDescriptor, ImportConfig, StudyDescriptor, StudyEngine};
use mocap_index::core::{
    AdaptiveTimestampParser, TICKS_PER_MILLISECOND, TICKS_PER_SECOND, TimeFormat, parse_clock,
    seconds_to_ticks, ticks_to_seconds,
};
use mocap_index::ingest::MemorySourceReader;

#[test]
fn tick_constants_are_consistent() {
    assert_eq!(TICKS_PER_SECOND, 1_000 * TICKS_PER_MILLISECOND);
    assert_eq!(seconds_to_ticks(2.5), Some(25_000_000));
    assert_eq!(seconds_to_ticks(f64::NAN), None);
    assert_eq!(ticks_to_seconds(15_000_000), 1.5);
}

#[test]
fn each_format_parses_its_own_encoding() {
    assert_eq!(TimeFormat::Ticks.parse("123456"), Some(123_456));
    assert_eq!(TimeFormat::Ticks.parse("1.5"), None);
    assert_eq!(TimeFormat::Seconds.parse(" 0.25 "), Some(2_500_000));
    assert_eq!(TimeFormat::Clock.parse("00:01:00.5"), Some(605_000_000));
    assert_eq!(TimeFormat::Clock.parse("12.5"), None);
}

#[test]
fn format_tokens_resolve() {
    assert_eq!(TimeFormat::from_token("Ticks"), Some(TimeFormat::Ticks));
    assert_eq!(TimeFormat::from_token("seconds"), Some(TimeFormat::Seconds));
    assert_eq!(TimeFormat::from_token("clock"), Some(TimeFormat::Clock));
    assert_eq!(TimeFormat::from_token("fortnights"), None);
}

#[test]
fn dated_clock_values_use_any_supported_date_layout() {
    let iso = parse_clock("2024-03-01 10:00:00.25");
    assert!(iso.is_some());
    assert_eq!(parse_clock("2024/03/01 10:00:00.25"), iso);
    assert_eq!(parse_clock("01.03.2024 10:00:00.25"), iso);
    assert_eq!(parse_clock("not-a-date 10:00:00"), None);
}

#[test]
fn adaptive_parser_switches_and_sticks() {
    let mut parser = AdaptiveTimestampParser::new(TimeFormat::Seconds);
    assert_eq!(parser.parse("00:00:02"), Some(20_000_000));
    assert_eq!(parser.current(), TimeFormat::Clock);

    // Clock stays remembered while it keeps working.
    assert_eq!(parser.parse("00:00:03"), Some(30_000_000));
    assert_eq!(parser.current(), TimeFormat::Clock);

    // Integer input falls back to ticks first.
    assert_eq!(parser.parse("42"), Some(42));
    assert_eq!(parser.current(), TimeFormat::Ticks);

    assert_eq!(parser.parse("garbage"), None);
    assert_eq!(parser.current(), TimeFormat::Ticks);
}

fn single_file_engine(time_format: &str, contents: &str) -> StudyEngine<MemorySourceReader> {
    let descriptor = StudyDescriptor::new("times", vec!["s".to_owned()], vec!["c".to_owned()])
        .with_entity(
            EntityDescriptor::new(1, "clocked")
                .with_time_format(time_format)
                .with_timestamp("time")
                .with_position("x", "{0}", "{0}")
                .with_source("clock.csv", 0, "c"),
        );
    let mut engine = StudyEngine::new(
        MemorySourceReader::new().with_file("clock.csv", contents),
        ImportConfig::default(),
    )
    .expect("engine init");
    engine.load_study(&descriptor).expect("study should load");
    engine
}

#[test]
fn clock_columns_import_relative_to_first_row() {
    let engine = single_file_engine(
        "clock",
        "time,x\n10:00:00.000,0\n10:00:00.500,1\n10:00:01.250,2\n",
    );
    let timestamps: Vec<i64> = engine
        .samples(1, 0, 0)
        .expect("samples")
        .iter()
        .map(|sample| sample.timestamp)
        .collect();
    assert_eq!(timestamps, vec![0, 5_000_000, 12_500_000]);
}

#[test]
fn unparsable_timestamps_become_zero_and_import_continues() {
    let engine = single_file_engine("seconds", "time,x\n1,0\n???,1\n2,2\n");
    let samples = engine.samples(1, 0, 0).expect("samples");

    assert_eq!(samples.len(), 3);
    // The bad row sorts first at tick 0, which becomes the origin.
    assert_eq!(samples[0].position.x, 1.0);
    assert_eq!(samples[0].timestamp, 0);
    assert_eq!(samples[1].timestamp, TICKS_PER_SECOND);
    assert_eq!(samples[2].timestamp, 2 * TICKS_PER_SECOND);
}

#[test]
fn declared_format_mismatch_recovers_through_fallback() {
    let engine = single_file_engine("ticks", "time,x\n0.5,0\n1.0,1\n");
    assert_eq!(engine.max_timestamp(1, 0, 0).expect("max"), 5_000_000);
}

#[test]
fn elapsed_clocks_run_past_twenty_four_hours() {
    let engine = single_file_engine(
        "clock",
        "time,x\n23:59:59.5,0\n24:00:00.5,1\n25:00:00,2\n",
    );
    let timestamps: Vec<i64> = engine
        .samples(1, 0, 0)
        .expect("samples")
        .iter()
        .map(|sample| sample.timestamp)
        .collect();
    assert_eq!(timestamps, vec![0, TICKS_PER_SECOND, 36_005_000_000]);
}
