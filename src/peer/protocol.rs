//! Peer Network Protocol
//!
//! Endpoints exposed by coordinator nodes and the helpers that build and
//! interpret them.

/// Coordinator endpoint announcing that a message is held at a storage node.
/// Full form: `/announce/<messageID>/<callerAddress>`.
pub const ENDPOINT_ANNOUNCE: &str = "/announce";
/// Coordinator endpoint reporting a message's delivery/replication status.
/// Full form: `/status/<messageID>`.
pub const ENDPOINT_STATUS: &str = "/status";

/// Status value meaning "no status known".
pub const STATUS_UNKNOWN: i64 = -1;

pub fn announce_url(coordinator: &str, message_id: &str, caller_address: &str) -> String {
    format!(
        "http://{}{}/{}/{}",
        coordinator, ENDPOINT_ANNOUNCE, message_id, caller_address
    )
}

pub fn status_url(coordinator: &str, message_id: &str) -> String {
    format!("http://{}{}/{}", coordinator, ENDPOINT_STATUS, message_id)
}

/// Interprets a coordinator's announce response as the redistribute signal.
/// Only the literal `true` counts.
pub fn parse_redistribute_signal(body: &str) -> bool {
    body.trim() == "true"
}

/// Interprets a coordinator's status response. Unparseable bodies yield
/// `STATUS_UNKNOWN`.
pub fn parse_status(body: &str) -> i64 {
    body.trim().parse().unwrap_or(STATUS_UNKNOWN)
}
