//! Per-worker dispatch counters

use serde::Serialize;

/// Counts for one worker's pass over its chunks
///
/// `assigned == dispatched + skipped` once the loop completes without aborting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchStats {
    /// Chunks owned by this worker
    pub assigned: usize,
    /// Chunks handed to the runner
    pub dispatched: usize,
    /// Runs that exited successfully
    pub succeeded: usize,
    /// Runs that failed, crashed, or could not start
    pub failed: usize,
    /// Malformed lines skipped
    pub skipped: usize,
}

impl DispatchStats {
    pub fn new(assigned: usize) -> Self {
        Self {
            assigned,
            ..Self::default()
        }
    }

    pub fn record_run(&mut self, success: bool) {
        self.dispatched += 1;
        if success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }

    /// Chunks not yet processed
    pub fn remaining(&self) -> usize {
        self.assigned.saturating_sub(self.dispatched + self.skipped)
    }
}
