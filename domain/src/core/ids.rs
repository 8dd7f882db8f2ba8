//! Process-unique identifiers.
//!
//! Identifiers have the shape `{prefix}_{millis}_{sequence}`: the wall-clock
//! part keeps them roughly sortable across restarts, the sequence keeps them
//! unique within a process even when two are minted in the same millisecond.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Milliseconds since the Unix epoch (0 if the clock is before the epoch).
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Mint a new identifier with the given prefix.
pub fn unique_id(prefix: &str) -> String {
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{}_{}_{:06x}", prefix, now_millis(), seq)
}
