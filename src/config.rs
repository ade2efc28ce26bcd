//! Node configuration.
//!
//! Command-line arguments are parsed by `clap` into `Args` and converted into
//! `Config`, which the rest of the node consumes.

use crate::executor::types::OverflowPolicy;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(clap::Parser, Debug)]
#[command(version, about = "Storage node of the message network")]
pub struct Args {
    /// Address the storage HTTP API listens on.
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub listen: SocketAddr,

    /// Address other nodes use to reach this node. Defaults to `--listen`.
    #[arg(long)]
    pub advertise: Option<String>,

    /// Largest accepted message body, in megabytes.
    #[arg(long, default_value_t = 1)]
    pub max_message_size_mb: u64,

    /// Coordinator node address. Repeatable.
    #[arg(long = "coordinator")]
    pub coordinators: Vec<String>,

    /// Storage node address. Repeatable.
    #[arg(long = "storage-node")]
    pub storage_nodes: Vec<String>,

    /// Directory for message files. Messages are kept in memory when absent.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Number of background job workers.
    #[arg(long, default_value_t = 4)]
    pub workers: usize,

    /// Maximum number of pending background jobs.
    #[arg(long, default_value_t = 1024)]
    pub queue_capacity: usize,

    /// What to do with a new job when the queue is full.
    #[arg(long, value_enum, default_value_t = OverflowPolicy::Reject)]
    pub overflow_policy: OverflowPolicy,

    /// Longest a submission waits for queue space under the `block` policy.
    #[arg(long, default_value_t = 250)]
    pub submit_timeout_ms: u64,

    /// Upper bound on a single background job's run time.
    #[arg(long, default_value_t = 10_000)]
    pub job_timeout_ms: u64,

    /// Timeout for each outbound request to a peer.
    #[arg(long, default_value_t = 2_000)]
    pub peer_timeout_ms: u64,

    /// Attempts per peer request. 1 disables retries.
    #[arg(long, default_value_t = 1)]
    pub peer_attempts: usize,

    /// Interval between queue statistics log lines.
    #[arg(long, default_value_t = 30)]
    pub stats_interval_secs: u64,
}

/// Configuration for running a storage node.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_address: SocketAddr,
    /// Sent to coordinators as this node's address in announcements.
    pub advertised_address: String,
    /// Put bodies larger than this many bytes are refused with 413.
    pub max_message_size: usize,
    pub coordinators: Vec<String>,
    pub storage_nodes: Vec<String>,
    pub data_dir: Option<PathBuf>,
    pub worker_count: usize,
    pub queue_capacity: usize,
    pub overflow_policy: OverflowPolicy,
    pub submit_timeout: Duration,
    pub job_timeout: Duration,
    pub peer_timeout: Duration,
    pub peer_attempts: usize,
    pub stats_interval: Duration,
}

impl Config {
    pub fn max_message_size_from_mb(megabytes: u64) -> usize {
        usize::try_from(megabytes.saturating_mul(1024 * 1024)).unwrap_or(usize::MAX)
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            advertised_address: args
                .advertise
                .unwrap_or_else(|| args.listen.to_string()),
            listen_address: args.listen,
            max_message_size: Self::max_message_size_from_mb(args.max_message_size_mb),
            coordinators: args.coordinators,
            storage_nodes: args.storage_nodes,
            data_dir: args.data_dir,
            worker_count: args.workers,
            queue_capacity: args.queue_capacity,
            overflow_policy: args.overflow_policy,
            submit_timeout: Duration::from_millis(args.submit_timeout_ms),
            job_timeout: Duration::from_millis(args.job_timeout_ms),
            peer_timeout: Duration::from_millis(args.peer_timeout_ms),
            peer_attempts: args.peer_attempts,
            stats_interval: Duration::from_secs(args.stats_interval_secs.max(1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults_from_empty_command_line() {
        let config = Config::from(Args::parse_from(["storage-node"]));

        assert_eq!(config.listen_address.to_string(), "127.0.0.1:8080");
        assert_eq!(config.advertised_address, "127.0.0.1:8080");
        assert_eq!(config.max_message_size, 1024 * 1024);
        assert_eq!(config.overflow_policy, OverflowPolicy::Reject);
        assert!(config.coordinators.is_empty());
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_full_command_line() {
        let args = Args::parse_from([
            "storage-node",
            "--listen",
            "0.0.0.0:9000",
            "--advertise",
            "node-a.example:9000",
            "--max-message-size-mb",
            "4",
            "--coordinator",
            "10.0.0.1:7000",
            "--coordinator",
            "10.0.0.2:7000",
            "--storage-node",
            "10.0.1.1:9000",
            "--overflow-policy",
            "block",
            "--job-timeout-ms",
            "500",
        ]);

        let config = Config::from(args);

        assert_eq!(config.advertised_address, "node-a.example:9000");
        assert_eq!(config.max_message_size, 4 * 1024 * 1024);
        assert_eq!(config.coordinators, vec!["10.0.0.1:7000", "10.0.0.2:7000"]);
        assert_eq!(config.storage_nodes, vec!["10.0.1.1:9000"]);
        assert_eq!(config.overflow_policy, OverflowPolicy::Block);
        assert_eq!(config.job_timeout, Duration::from_millis(500));
    }
}
