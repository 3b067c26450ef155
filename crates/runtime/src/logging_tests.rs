use super::*;
use log::{Level, Metadata, Record};
use serial_test::serial;

#[test]
fn parse_level_cases() {
    let cases: &[(Option<&str>, Level)] = &[
        (None, Level::Warn),
        (Some("debug"), Level::Debug),
        (Some("DEBUG"), Level::Debug),
        (Some(" info "), Level::Info),
        (Some("warn"), Level::Warn),
        (Some("error"), Level::Error),
        (Some("TRACE"), Level::Trace),
        (Some("garbage"), Level::Warn),
        (Some("off"), Level::Warn),
        (Some(""), Level::Warn),
    ];

    for (value, expected) in cases {
        assert_eq!(parse_level(*value), *expected, "value {:?}", value);
    }
}

#[test]
#[serial]
fn get_level_from_env_reads_program_variable() {
    unsafe { std::env::set_var(PROGRAM_LOG_LEVEL, "debug") };
    let lvl = get_level_from_env();
    unsafe { std::env::remove_var(PROGRAM_LOG_LEVEL) };

    assert_eq!(lvl, Level::Debug);
    assert_eq!(get_level_from_env(), Level::Warn);
}

#[test]
fn workspace_targets_follow_configured_level() {
    let logger = Logger {
        level: Level::Debug,
    };

    let ours = Metadata::builder()
        .level(Level::Debug)
        .target("gazette_engine::executor")
        .build();
    let theirs = Metadata::builder()
        .level(Level::Debug)
        .target("regex::compile")
        .build();
    let theirs_warn = Metadata::builder()
        .level(Level::Warn)
        .target("regex::compile")
        .build();

    assert!(logger.enabled(&ours));
    assert!(!logger.enabled(&theirs));
    assert!(logger.enabled(&theirs_warn));
}

#[test]
fn quiet_level_applies_to_dependencies_too() {
    let logger = Logger {
        level: Level::Error,
    };

    let dep_warn = Metadata::builder()
        .level(Level::Warn)
        .target("serde_json")
        .build();
    assert!(!logger.enabled(&dep_warn));
}

#[test]
fn format_includes_level_target_and_message() {
    let logger = Logger { level: Level::Info };
    let args = format_args!("partition failed");
    let record = Record::builder()
        .level(Level::Warn)
        .target("gazette_engine")
        .args(args)
        .build();

    let line = logger.format(&record);
    assert!(line.contains("WARN"), "line: {line}");
    assert!(line.contains("[gazette_engine]"), "line: {line}");
    assert!(line.ends_with("partition failed"), "line: {line}");
}
