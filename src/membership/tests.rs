//! Membership Module Tests
//!
//! Covers the node directory used by handlers and replication jobs.
//!
//! ## Test Scopes
//! - **Listings**: Coordinator and storage node queries, including limits.
//! - **Sampling**: Random coordinator samples are distinct and bounded.
//! - **Status Records**: Message status persistence.

#[cfg(test)]
mod tests {
    use crate::membership::directory::{NodeDirectory, StaticDirectory};
    use crate::membership::types::{Node, NodeRole};
    use std::collections::HashSet;

    fn seeded_directory() -> std::sync::Arc<StaticDirectory> {
        let coordinators: Vec<String> = (0..5).map(|i| format!("10.0.0.{}:7000", i)).collect();
        let storage: Vec<String> = (0..15).map(|i| format!("10.0.1.{}:8080", i)).collect();
        StaticDirectory::from_addresses(&coordinators, &storage)
    }

    // ============================================================
    // LISTINGS
    // ============================================================

    #[tokio::test]
    async fn test_coordinator_nodes_returns_all_coordinators() {
        let directory = seeded_directory();

        let coordinators = directory.coordinator_nodes().await.unwrap();

        assert_eq!(coordinators.len(), 5);
        assert!(coordinators.iter().all(|n| n.role == NodeRole::Coordinator));
    }

    #[tokio::test]
    async fn test_storage_nodes_respects_limit() {
        let directory = seeded_directory();

        let nodes = directory.storage_nodes(10).await.unwrap();

        assert_eq!(nodes.len(), 10);
        assert!(nodes.iter().all(|n| n.role == NodeRole::Storage));
    }

    #[tokio::test]
    async fn test_storage_nodes_limit_above_population() {
        let directory = StaticDirectory::new();
        directory.register(Node::storage("127.0.0.1:9000"));

        let nodes = directory.storage_nodes(10).await.unwrap();

        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].address, "127.0.0.1:9000");
    }

    #[tokio::test]
    async fn test_listings_are_sorted_by_address() {
        let directory = StaticDirectory::new();
        directory.register(Node::coordinator("b:1"));
        directory.register(Node::coordinator("a:1"));
        directory.register(Node::coordinator("c:1"));

        let addresses: Vec<String> = directory
            .coordinator_nodes()
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.address)
            .collect();

        assert_eq!(addresses, vec!["a:1", "b:1", "c:1"]);
    }

    // ============================================================
    // SAMPLING
    // ============================================================

    #[tokio::test]
    async fn test_random_coordinator_sample_is_distinct_and_bounded() {
        let directory = seeded_directory();

        for _ in 0..50 {
            let sample = directory.random_coordinator_nodes(3).await.unwrap();
            assert_eq!(sample.len(), 3);

            let unique: HashSet<String> = sample.iter().map(|n| n.address.clone()).collect();
            assert_eq!(unique.len(), 3, "Sample must not repeat a coordinator");
            assert!(sample.iter().all(|n| n.role == NodeRole::Coordinator));
        }
    }

    #[tokio::test]
    async fn test_random_sample_with_few_coordinators() {
        let directory = StaticDirectory::new();
        directory.register(Node::coordinator("127.0.0.1:7000"));
        directory.register(Node::storage("127.0.0.1:8080"));

        let sample = directory.random_coordinator_nodes(3).await.unwrap();

        assert_eq!(sample.len(), 1);
        assert_eq!(sample[0].address, "127.0.0.1:7000");
    }

    #[tokio::test]
    async fn test_random_sample_empty_directory() {
        let directory = StaticDirectory::new();

        let sample = directory.random_coordinator_nodes(3).await.unwrap();

        assert!(sample.is_empty());
    }

    // ============================================================
    // STATUS RECORDS
    // ============================================================

    #[tokio::test]
    async fn test_update_message_status_overwrites() {
        let directory = StaticDirectory::new();

        directory.update_message_status("msg-1", 1).await.unwrap();
        directory.update_message_status("msg-1", 4).await.unwrap();

        assert_eq!(directory.message_status("msg-1"), Some(4));
        assert_eq!(directory.message_status("msg-2"), None);
    }

    #[test]
    fn test_node_serializes_role_lowercase() {
        let node = Node::coordinator("127.0.0.1:7000");

        let json = serde_json::to_value(&node).unwrap();

        assert_eq!(json["role"], "coordinator");
        assert_eq!(json["address"], "127.0.0.1:7000");
    }
}
