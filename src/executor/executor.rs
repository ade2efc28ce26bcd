//! Worker Pool Implementation
//!
//! Spawns background workers that drain the `JobQueue`. Each job is executed
//! exactly once by whichever worker receives it.
//!
//! ## Responsibilities
//! - **Draining**: Workers await the shared receiver; an idle pool costs nothing.
//! - **Bounding**: Every job runs under `job_timeout` so a hung peer cannot pin a worker.
//! - **Isolation**: Job errors and panics are logged and counted, never propagated.

use super::queue::JobQueue;
use super::types::Job;

use anyhow::Result;
use async_trait::async_trait;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Executes the work a `Job` describes.
#[async_trait]
pub trait JobHandler: Send + Sync {
    async fn run(&self, job: &Job) -> Result<()>;
}

/// The engine that drives job execution.
pub struct JobExecutor {
    /// Source of jobs.
    queue: Arc<JobQueue>,
    /// What each job actually does.
    handler: Arc<dyn JobHandler>,
    /// Number of concurrent workers.
    worker_count: usize,
    /// Upper bound on a single job's run time.
    job_timeout: Duration,
}

impl JobExecutor {
    pub fn new(
        queue: Arc<JobQueue>,
        handler: Arc<dyn JobHandler>,
        worker_count: usize,
        job_timeout: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            queue,
            handler,
            worker_count: worker_count.max(1),
            job_timeout,
        })
    }

    /// Spawns the workers and returns their handles.
    ///
    /// Workers exit once the queue is closed and drained.
    pub fn start(self: Arc<Self>) -> Vec<JoinHandle<()>> {
        tracing::info!("Starting {} job workers", self.worker_count);

        (0..self.worker_count)
            .map(|worker_id| {
                let executor = self.clone();
                tokio::spawn(async move {
                    executor.worker_loop(worker_id).await;
                })
            })
            .collect()
    }

    async fn worker_loop(&self, worker_id: usize) {
        tracing::debug!("Worker {} started", worker_id);
        let receiver = self.queue.receiver();

        while let Ok(job) = receiver.recv().await {
            self.execute(worker_id, job).await;
        }

        tracing::debug!("Worker {} stopped: queue closed", worker_id);
    }

    async fn execute(&self, worker_id: usize, job: Job) {
        tracing::debug!(
            "Worker {} running {} job for message {}",
            worker_id,
            job.kind(),
            job.message_id()
        );

        let run = AssertUnwindSafe(self.handler.run(&job)).catch_unwind();
        let stats = self.queue.stats();

        match tokio::time::timeout(self.job_timeout, run).await {
            Ok(Ok(Ok(()))) => {
                stats.record_completed();
                tracing::debug!("{} job for message {} completed", job.kind(), job.message_id());
            }
            Ok(Ok(Err(e))) => {
                stats.record_failed();
                tracing::warn!(
                    "{} job for message {} failed: {}",
                    job.kind(),
                    job.message_id(),
                    e
                );
            }
            Ok(Err(_)) => {
                stats.record_failed();
                tracing::error!(
                    "{} job for message {} panicked",
                    job.kind(),
                    job.message_id()
                );
            }
            Err(_) => {
                stats.record_timed_out();
                tracing::warn!(
                    "{} job for message {} timed out after {:?}",
                    job.kind(),
                    job.message_id(),
                    self.job_timeout
                );
            }
        }
    }
}
