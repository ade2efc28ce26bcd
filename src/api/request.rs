use super::protocol::STORAGE_PREFIX;

use percent_encoding::percent_decode_str;
use regex::Regex;
use std::sync::LazyLock;

static INVALID_ID_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^A-Za-z0-9]").expect("static pattern is valid"));

/// Operation requested on the storage API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Get,
    Put,
    Update,
    Control,
}

impl Action {
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "get" => Some(Action::Get),
            "put" => Some(Action::Put),
            "update" => Some(Action::Update),
            "control" => Some(Action::Control),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InvalidRequest {
    #[error("path is not below /storage/")]
    NotStoragePath,
    #[error("unknown action {0:?}")]
    UnknownAction(String),
    #[error("missing message id")]
    MissingMessageId,
}

/// A validated storage request.
///
/// Only `parse` constructs one, so holding a `StorageRequest` means the
/// action is known and `message_id` is sanitized and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageRequest {
    pub action: Action,
    pub message_id: String,
}

impl StorageRequest {
    /// Parses `/storage/<action>/<rawID>[/...]`. Segments after the id are ignored.
    ///
    /// The path is percent-decoded before it is split, so an encoded `/`
    /// starts a new segment and `%20` reaches sanitization as a space.
    pub fn parse(path: &str) -> Result<Self, InvalidRequest> {
        let decoded = percent_decode_str(path).decode_utf8_lossy();
        let rest = decoded
            .strip_prefix(STORAGE_PREFIX)
            .ok_or(InvalidRequest::NotStoragePath)?;

        let mut segments = rest.split('/');
        let action_segment = segments.next().unwrap_or_default();
        let message_id = sanitize_message_id(segments.next().unwrap_or_default());

        let action = Action::from_segment(action_segment)
            .ok_or_else(|| InvalidRequest::UnknownAction(action_segment.to_string()))?;

        if message_id.is_empty() {
            return Err(InvalidRequest::MissingMessageId);
        }

        Ok(Self { action, message_id })
    }
}

/// Maps every character outside `[A-Za-z0-9]` to `-`.
pub fn sanitize_message_id(raw: &str) -> String {
    INVALID_ID_CHARS.replace_all(raw, "-").into_owned()
}
