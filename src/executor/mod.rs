//! Background Job Module
//!
//! Decouples replication announcements and status refreshes from the HTTP
//! response path.
//!
//! ## Architecture Overview
//! 1. **Submission**: Handlers build a typed `Job` and hand it to the `JobQueue`
//!    after the store write has succeeded. Submission never waits for execution.
//! 2. **Back-pressure**: The queue is bounded; a full queue is handled by an
//!    explicit `OverflowPolicy` and counted.
//! 3. **Execution**: `JobExecutor` workers drain the queue concurrently, each job
//!    bounded by a timeout.
//! 4. **Dispatch**: `NodeJobs` matches on the job variant and talks to the node
//!    directory and coordinator peers.
//!
//! ## Submodules
//! - **`types`**: Job variants, overflow policy, queue counters.
//! - **`queue`**: The bounded process-wide queue.
//! - **`executor`**: Worker pool and the `JobHandler` seam.
//! - **`jobs`**: The storage node's job logic.

pub mod executor;
pub mod jobs;
pub mod queue;
pub mod types;
