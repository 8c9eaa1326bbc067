//! Sync counters

use std::ops::AddAssign;
use std::time::Duration;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SyncStats {
    /// Completed update cycles
    pub ticks: u64,
    pub messages_sent: u64,
    /// Encodes skipped because the value had not changed
    pub messages_suppressed: u64,
    /// Values that could not be encoded into a datagram
    pub messages_failed: u64,
    pub messages_received: u64,
    pub messages_applied: u64,
    /// Received messages whose address had no binding
    pub messages_dropped: u64,
    pub stale_pruned: u64,
    pub last_tick_duration: Duration,
}

impl AddAssign<&SyncStats> for SyncStats {
    fn add_assign(&mut self, other: &SyncStats) {
        self.ticks += other.ticks;
        self.messages_sent += other.messages_sent;
        self.messages_suppressed += other.messages_suppressed;
        self.messages_failed += other.messages_failed;
        self.messages_received += other.messages_received;
        self.messages_applied += other.messages_applied;
        self.messages_dropped += other.messages_dropped;
        self.stale_pruned += other.stale_pruned;
    }
}
