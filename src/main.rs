use clap::Parser;
use storage_node::api::{StorageContext, router};
use storage_node::config::{Args, Config};
use storage_node::executor::executor::JobExecutor;
use storage_node::executor::jobs::NodeJobs;
use storage_node::executor::queue::JobQueue;
use storage_node::membership::directory::StaticDirectory;
use storage_node::peer::client::HttpPeerClient;
use storage_node::storage::disk::DiskStore;
use storage_node::storage::memory::MemoryStore;
use storage_node::storage::types::MessageStore;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from(Args::parse());

    tracing::info!(
        "Starting storage node on {} (advertised as {})",
        config.listen_address,
        config.advertised_address
    );
    tracing::info!("Maximum message size: {} bytes", config.max_message_size);

    // 1. Local message store:
    let store: Arc<dyn MessageStore> = match &config.data_dir {
        Some(dir) => DiskStore::open(dir).await?,
        None => {
            tracing::warn!("No --data-dir given, messages are kept in memory only");
            MemoryStore::new()
        }
    };

    // 2. Node directory and peer client:
    let directory = StaticDirectory::from_addresses(&config.coordinators, &config.storage_nodes);
    let peers = Arc::new(HttpPeerClient::new(config.peer_timeout, config.peer_attempts));

    // 3. Job queue and workers:
    let jobs = JobQueue::new(
        config.queue_capacity,
        config.overflow_policy,
        config.submit_timeout,
    );
    let node_jobs = NodeJobs::new(directory.clone(), peers, config.advertised_address.clone());
    let workers = JobExecutor::new(
        jobs.clone(),
        node_jobs,
        config.worker_count,
        config.job_timeout,
    )
    .start();

    // 4. Queue stats reporter:
    let stats_queue = jobs.clone();
    let stats_interval = config.stats_interval;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(stats_interval);

        loop {
            interval.tick().await;
            let stats = stats_queue.snapshot();
            tracing::info!(
                "Job queue stats: depth={}/{} submitted={} rejected={} completed={} failed={} timed_out={}",
                stats.depth,
                stats.capacity,
                stats.submitted,
                stats.rejected,
                stats.completed,
                stats.failed,
                stats.timed_out
            );
        }
    });

    // 5. HTTP server:
    let app = router(Arc::new(StorageContext {
        store,
        directory,
        jobs: jobs.clone(),
        max_message_size: config.max_message_size,
    }));

    let listener = tokio::net::TcpListener::bind(config.listen_address).await?;
    tracing::info!("Storage API listening on {}", listener.local_addr()?);
    tracing::info!("Press Ctrl+C to shutdown");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await?;

    // 6. Drain background jobs:
    tracing::info!("Shutting down, draining {} queued job(s)", jobs.len());
    jobs.close();
    for worker in workers {
        let _ = worker.await;
    }
    tracing::info!("Done.");

    Ok(())
}
