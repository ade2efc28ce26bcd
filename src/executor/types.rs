use std::sync::atomic::{AtomicU64, Ordering};

/// A deferred unit of work, decoupled from the HTTP request that created it.
///
/// The payload is owned by the job; once submitted, the submitting handler
/// has no further access to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    /// Announce a freshly stored message to a random sample of coordinators.
    AnnounceReplication { message_id: String },
    /// Fetch the message's current status and record it in the node directory.
    RefreshStatus { message_id: String },
}

impl Job {
    pub fn message_id(&self) -> &str {
        match self {
            Job::AnnounceReplication { message_id } | Job::RefreshStatus { message_id } => {
                message_id
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Job::AnnounceReplication { .. } => "announce_replication",
            Job::RefreshStatus { .. } => "refresh_status",
        }
    }
}

/// What `JobQueue::submit` does when the queue is at capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OverflowPolicy {
    /// Fail the submission immediately.
    #[default]
    Reject,
    /// Wait for free capacity, at most the configured submit timeout, then fail.
    Block,
}

/// Monotonic counters describing queue traffic.
#[derive(Debug, Default)]
pub struct QueueStats {
    submitted: AtomicU64,
    rejected: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
    timed_out: AtomicU64,
}

impl QueueStats {
    pub fn record_submitted(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_completed(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_timed_out(&self) {
        self.timed_out.fetch_add(1, Ordering::Relaxed);
    }
}

/// Point-in-time view of the queue, suitable for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueStatsSnapshot {
    pub depth: usize,
    pub capacity: usize,
    pub submitted: u64,
    pub rejected: u64,
    pub completed: u64,
    pub failed: u64,
    pub timed_out: u64,
}

impl QueueStatsSnapshot {
    pub fn capture(stats: &QueueStats, depth: usize, capacity: usize) -> Self {
        Self {
            depth,
            capacity,
            submitted: stats.submitted.load(Ordering::Relaxed),
            rejected: stats.rejected.load(Ordering::Relaxed),
            completed: stats.completed.load(Ordering::Relaxed),
            failed: stats.failed.load(Ordering::Relaxed),
            timed_out: stats.timed_out.load(Ordering::Relaxed),
        }
    }
}
