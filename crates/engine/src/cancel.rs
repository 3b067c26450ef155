//! Cooperative cancellation for fan-out work.
//!
//! Scans check the token between documents; `is_cancelled_sparse` keeps the
//! atomic load out of the hot path for large partitions.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// How many documents a scan visits between cancellation checks.
pub const CANCEL_CHECK_INTERVAL: usize = 0x400;

#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token observing an existing flag, e.g. a process-wide shutdown flag.
    pub fn from_flag(flag: Arc<AtomicBool>) -> Self {
        Self { flag }
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Checks the flag only every `CANCEL_CHECK_INTERVAL` iterations.
    #[inline]
    pub fn is_cancelled_sparse(&self, counter: usize) -> bool {
        counter & (CANCEL_CHECK_INTERVAL - 1) == 0 && self.is_cancelled()
    }
}
