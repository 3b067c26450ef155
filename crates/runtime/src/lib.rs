mod config;
pub mod logging;

pub use config::{
    DEFAULT_CACHE_TTL, DEFAULT_FETCH_CAP, DEFAULT_PAGE_SIZE, PARTITION_PREFIX, PROGRAM_NAME,
    SINGLE_PARTITION_NAME, Settings, default_snapshot_path, default_socket_path, gazette_dir,
};

pub use logging::init;
