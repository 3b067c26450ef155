use std::{num::NonZeroUsize, path::PathBuf, str::FromStr, thread, time::Duration};

use log::warn;

pub const PROGRAM_NAME: &str = "gazette";
pub const PROGRAM_LOG_LEVEL: &str = "GAZETTE_LOG_LEVEL";

pub const METADATA_PATH_ENV: &str = "GAZETTE_METADATA_PATH";
pub const METADATA_URL_ENV: &str = "GAZETTE_METADATA_URL";
pub const CACHE_TTL_ENV: &str = "GAZETTE_CACHE_TTL_SECS";
pub const FETCH_CAP_ENV: &str = "GAZETTE_FETCH_CAP";
pub const WORKERS_ENV: &str = "GAZETTE_WORKERS";
pub const REFRESH_ENV: &str = "GAZETTE_REFRESH_SECS";
pub const PARTITION_BY_YEAR_ENV: &str = "GAZETTE_PARTITION_BY_YEAR";

/// Year partitions are named `gazettes_<YYYY>`.
pub const PARTITION_PREFIX: &str = "gazettes_";
/// Name of the only partition when the corpus is not split by year.
pub const SINGLE_PARTITION_NAME: &str = "global_metadata";

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);
/// Upper bound on documents fetched from one partition for a single search.
pub const DEFAULT_FETCH_CAP: usize = 1000;
pub const DEFAULT_PAGE_SIZE: usize = 50;

const SNAPSHOT_FILE_NAME: &str = "metadata_cache.json";
const SOCKET_FILE_NAME: &str = "daemon.sock";

pub fn xdg_or_home(xdg_var: &str, home_suffix: &str) -> PathBuf {
    if let Some(dir) = std::env::var_os(xdg_var) {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(home_suffix)
    }
}

pub fn gazette_dir() -> PathBuf {
    xdg_or_home("XDG_CACHE_HOME", ".cache").join(PROGRAM_NAME)
}

/// Where the last good document set is persisted.
pub fn default_snapshot_path() -> PathBuf {
    gazette_dir().join(SNAPSHOT_FILE_NAME)
}

pub fn default_socket_path() -> PathBuf {
    gazette_dir().join(SOCKET_FILE_NAME)
}

/// Process-level settings, read from the environment.
///
/// Every field has a default; a malformed value is reported and replaced by
/// its default rather than aborting start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub metadata_path: Option<PathBuf>,
    /// Remote JSON document list; used when no `metadata_path` is set.
    pub metadata_url: Option<String>,
    pub cache_ttl: Duration,
    pub fetch_cap: usize,
    pub workers: usize,
    pub refresh_interval: Option<Duration>,
    pub partition_by_year: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            metadata_path: None,
            metadata_url: None,
            cache_ttl: DEFAULT_CACHE_TTL,
            fetch_cap: DEFAULT_FETCH_CAP,
            workers: default_workers(),
            refresh_interval: None,
            partition_by_year: true,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let metadata_path = lookup(METADATA_PATH_ENV)
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let metadata_url = lookup(METADATA_URL_ENV)
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty());

        let cache_ttl = parse_or(&lookup, CACHE_TTL_ENV, defaults.cache_ttl.as_secs())
            .map(Duration::from_secs)
            .unwrap_or(defaults.cache_ttl);

        let fetch_cap = parse_or(&lookup, FETCH_CAP_ENV, defaults.fetch_cap)
            .filter(|&n| n > 0)
            .unwrap_or(defaults.fetch_cap);

        let workers = parse_or(&lookup, WORKERS_ENV, defaults.workers)
            .filter(|&n| n > 0)
            .unwrap_or(defaults.workers);

        // Zero disables periodic refresh.
        let refresh_interval = parse_or(&lookup, REFRESH_ENV, 0u64)
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs);

        let partition_by_year = match lookup(PARTITION_BY_YEAR_ENV) {
            None => defaults.partition_by_year,
            Some(raw) => parse_flag(&raw).unwrap_or_else(|| {
                warn!("Ignoring invalid {PARTITION_BY_YEAR_ENV}={raw:?}");
                defaults.partition_by_year
            }),
        };

        Self {
            metadata_path,
            metadata_url,
            cache_ttl,
            fetch_cap,
            workers,
            refresh_interval,
            partition_by_year,
        }
    }
}

/// `None` only when the variable is set but cannot be parsed.
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let Some(raw) = lookup(key) else {
        return Some(default);
    };

    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("Ignoring invalid {key}={raw:?}");
            None
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn default_workers() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(4)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
