use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of identities for newly created items.
pub trait IdSource: Send + Sync {
    /// Produce the id for the item being created right now.
    fn next_id(&self) -> String;
}

/// Wall-clock ids: decimal milliseconds since the UNIX epoch.
///
/// Ids are non-decreasing across sequential calls and readable as
/// timestamps, but two creates in the same millisecond receive the same id.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClockIds;

impl SystemClockIds {
    /// Milliseconds since the UNIX epoch, or zero if the clock is set before it.
    pub fn now_ms() -> u128 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis()
    }
}

impl IdSource for SystemClockIds {
    fn next_id(&self) -> String {
        Self::now_ms().to_string()
    }
}

/// Counter-backed ids for tests and fixtures.
#[derive(Debug)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    /// Start counting at `first`.
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdSource for SequentialIds {
    fn next_id(&self) -> String {
        self.next.fetch_add(1, Ordering::Relaxed).to_string()
    }
}
