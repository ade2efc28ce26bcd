//! Job Queue
//!
//! The single process-wide, bounded queue between request handlers and the
//! worker pool. Handlers only ever call `submit_detached`, so a response is
//! never held up by a full queue; workers only ever receive.
//!
//! ## Back-pressure
//! Capacity is fixed at construction. When the queue is full, the configured
//! `OverflowPolicy` decides:
//! - **Reject**: `try_send` fails at once with `SubmitError::Full`.
//! - **Block**: the submitter waits for space, bounded by `submit_timeout`,
//!   then fails with `SubmitError::Full`.
//!
//! Either way the job is dropped, a warning is logged and the `rejected`
//! counter moves, so exhaustion is never silent.

use super::types::{Job, OverflowPolicy, QueueStats, QueueStatsSnapshot};

use async_channel::{Receiver, Sender, TrySendError};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("job queue is full (capacity {0})")]
    Full(usize),
    #[error("job queue is closed")]
    Closed,
}

pub struct JobQueue {
    sender: Sender<Job>,
    receiver: Receiver<Job>,
    capacity: usize,
    policy: OverflowPolicy,
    submit_timeout: Duration,
    stats: Arc<QueueStats>,
}

impl JobQueue {
    /// Creates a queue holding at most `capacity` pending jobs (minimum 1).
    pub fn new(capacity: usize, policy: OverflowPolicy, submit_timeout: Duration) -> Arc<Self> {
        let capacity = capacity.max(1);
        let (sender, receiver) = async_channel::bounded(capacity);

        tracing::info!(
            "Job queue created (capacity: {}, overflow policy: {:?})",
            capacity,
            policy
        );

        Arc::new(Self {
            sender,
            receiver,
            capacity,
            policy,
            submit_timeout,
            stats: Arc::new(QueueStats::default()),
        })
    }

    /// Hands a job to the worker pool.
    ///
    /// Returns once the job is queued or the overflow policy gave up on it.
    /// Never waits for the job to run.
    pub async fn submit(&self, job: Job) -> Result<(), SubmitError> {
        let kind = job.kind();
        let message_id = job.message_id().to_string();

        let result = match self.policy {
            OverflowPolicy::Reject => self.try_enqueue(job).map_err(|(e, _)| e),
            OverflowPolicy::Block => {
                match tokio::time::timeout(self.submit_timeout, self.sender.send(job)).await {
                    Ok(Ok(())) => Ok(()),
                    Ok(Err(_)) => Err(SubmitError::Closed),
                    Err(_) => Err(SubmitError::Full(self.capacity)),
                }
            }
        };

        self.record(kind, &message_id, &result);
        result
    }

    /// Hands a job to the worker pool without ever suspending the caller.
    ///
    /// A job that fits is queued before this returns. Under `Block`, a job
    /// that does not fit waits for space on a spawned task, still bounded by
    /// `submit_timeout`. Must be called from within a tokio runtime.
    pub fn submit_detached(self: &Arc<Self>, job: Job) {
        let kind = job.kind();
        let message_id = job.message_id().to_string();

        match self.try_enqueue(job) {
            Err((SubmitError::Full(_), Some(job))) if self.policy == OverflowPolicy::Block => {
                let queue = Arc::clone(self);
                tokio::spawn(async move {
                    // Outcome is logged and counted by `submit`.
                    let _ = queue.submit(job).await;
                });
            }
            result => self.record(kind, &message_id, &result.map_err(|(e, _)| e)),
        }
    }

    fn try_enqueue(&self, job: Job) -> Result<(), (SubmitError, Option<Job>)> {
        match self.sender.try_send(job) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(job)) => Err((SubmitError::Full(self.capacity), Some(job))),
            Err(TrySendError::Closed(_)) => Err((SubmitError::Closed, None)),
        }
    }

    fn record(&self, kind: &str, message_id: &str, result: &Result<(), SubmitError>) {
        match result {
            Ok(()) => {
                self.stats.record_submitted();
                tracing::debug!(
                    "Queued {} job for message {} (depth: {})",
                    kind,
                    message_id,
                    self.len()
                );
            }
            Err(e) => {
                self.stats.record_rejected();
                tracing::warn!("Dropped {} job for message {}: {}", kind, message_id, e);
            }
        }
    }

    /// A receiving handle for a worker.
    pub fn receiver(&self) -> Receiver<Job> {
        self.receiver.clone()
    }

    /// Stops accepting jobs. Workers drain what is queued, then exit.
    pub fn close(&self) -> bool {
        self.sender.close()
    }

    pub fn len(&self) -> usize {
        self.sender.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sender.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> &QueueStats {
        &self.stats
    }

    pub fn snapshot(&self) -> QueueStatsSnapshot {
        QueueStatsSnapshot::capture(&self.stats, self.len(), self.capacity)
    }
}
