// ABOUTME: Shared utility functions for Blueprint
// ABOUTME: Timestamp-derived identifiers and clock helpers

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static LAST_ISSUED_ID: AtomicU64 = AtomicU64::new(0);

/// Milliseconds since the Unix epoch
pub fn current_timestamp_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Generate an identifier from the current time in milliseconds.
///
/// Strictly increasing within a process: two calls in the same millisecond
/// get consecutive values. Not globally unique across processes.
pub fn generate_timestamp_id() -> String {
    let now = current_timestamp_millis();
    let mut last = LAST_ISSUED_ID.load(Ordering::Relaxed);
    loop {
        let next = if now > last { now } else { last + 1 };
        match LAST_ISSUED_ID.compare_exchange_weak(last, next, Ordering::SeqCst, Ordering::Relaxed)
        {
            Ok(_) => return next.to_string(),
            Err(actual) => last = actual,
        }
    }
}
