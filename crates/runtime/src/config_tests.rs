use std::collections::HashMap;

use super::*;
use serial_test::serial;

fn settings_from(pairs: &[(&str, &str)]) -> Settings {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Settings::from_lookup(|key| map.get(key).cloned())
}

#[test]
fn empty_environment_yields_defaults() {
    let s = settings_from(&[]);
    assert_eq!(s, Settings::default());
    assert_eq!(s.cache_ttl, Duration::from_secs(300));
    assert_eq!(s.fetch_cap, 1000);
    assert!(s.workers >= 1);
    assert!(s.refresh_interval.is_none());
    assert!(s.partition_by_year);
    assert!(s.metadata_path.is_none());
    assert!(s.metadata_url.is_none());
}

#[test]
fn values_are_read_from_lookup() {
    let s = settings_from(&[
        (METADATA_PATH_ENV, "/data/metadata.json"),
        (METADATA_URL_ENV, " https://example.org/global_metadata.json "),
        (CACHE_TTL_ENV, "60"),
        (FETCH_CAP_ENV, "25"),
        (WORKERS_ENV, "3"),
        (REFRESH_ENV, "900"),
        (PARTITION_BY_YEAR_ENV, "no"),
    ]);

    assert_eq!(s.metadata_path, Some(PathBuf::from("/data/metadata.json")));
    assert_eq!(s.metadata_url.as_deref(), Some("https://example.org/global_metadata.json"));
    assert_eq!(s.cache_ttl, Duration::from_secs(60));
    assert_eq!(s.fetch_cap, 25);
    assert_eq!(s.workers, 3);
    assert_eq!(s.refresh_interval, Some(Duration::from_secs(900)));
    assert!(!s.partition_by_year);
}

#[test]
fn malformed_values_fall_back_to_defaults() {
    let defaults = Settings::default();
    let s = settings_from(&[
        (METADATA_PATH_ENV, "   "),
        (METADATA_URL_ENV, ""),
        (CACHE_TTL_ENV, "five minutes"),
        (FETCH_CAP_ENV, "0"),
        (WORKERS_ENV, "-2"),
        (REFRESH_ENV, "soon"),
        (PARTITION_BY_YEAR_ENV, "maybe"),
    ]);

    assert_eq!(s.metadata_path, None);
    assert_eq!(s.metadata_url, None);
    assert_eq!(s.cache_ttl, defaults.cache_ttl);
    assert_eq!(s.fetch_cap, defaults.fetch_cap);
    assert_eq!(s.workers, defaults.workers);
    assert_eq!(s.refresh_interval, None);
    assert_eq!(s.partition_by_year, defaults.partition_by_year);
}

#[test]
fn zero_refresh_disables_periodic_refresh() {
    let s = settings_from(&[(REFRESH_ENV, "0")]);
    assert!(s.refresh_interval.is_none());
}

#[test]
fn parse_flag_cases() {
    let cases: &[(&str, Option<bool>)] = &[
        ("1", Some(true)),
        ("TRUE", Some(true)),
        (" yes ", Some(true)),
        ("on", Some(true)),
        ("0", Some(false)),
        ("False", Some(false)),
        ("no", Some(false)),
        ("off", Some(false)),
        ("", None),
        ("2", None),
    ];

    for (input, expected) in cases {
        assert_eq!(parse_flag(input), *expected, "input: {:?}", input);
    }
}

#[test]
#[serial]
fn from_env_reads_process_environment() {
    unsafe { std::env::set_var(FETCH_CAP_ENV, "7") };
    let s = Settings::from_env();
    unsafe { std::env::remove_var(FETCH_CAP_ENV) };

    assert_eq!(s.fetch_cap, 7);
}

#[test]
#[serial]
fn xdg_cache_home_controls_gazette_dir() {
    unsafe { std::env::set_var("XDG_CACHE_HOME", "/tmp/gazette-xdg") };
    let dir = gazette_dir();
    let snapshot = default_snapshot_path();
    let socket = default_socket_path();
    unsafe { std::env::remove_var("XDG_CACHE_HOME") };

    assert_eq!(dir, PathBuf::from("/tmp/gazette-xdg/gazette"));
    assert_eq!(snapshot, dir.join("metadata_cache.json"));
    assert_eq!(socket, dir.join("daemon.sock"));
}
