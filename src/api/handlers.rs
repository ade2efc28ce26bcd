use super::StorageContext;
use super::protocol::*;
use super::request::{Action, StorageRequest};
use crate::executor::types::Job;
use crate::storage::types::Message;

use axum::body::Body;
use axum::extract::{Extension, Request};
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use serde::Serialize;
use std::sync::Arc;

/// Entry point for every `/storage/...` request.
pub async fn handle_request(
    Extension(context): Extension<Arc<StorageContext>>,
    request: Request,
) -> Response {
    let path = request.uri().path().to_string();
    tracing::debug!("Handling incoming request to {}", path);

    let storage_request = match StorageRequest::parse(&path) {
        Ok(storage_request) => storage_request,
        Err(e) => {
            tracing::debug!("Rejected request to {}: {}", path, e);
            return invalid_request();
        }
    };

    let StorageRequest { action, message_id } = storage_request;
    match action {
        Action::Get => handle_get(&context, &message_id).await,
        Action::Put => handle_put(&context, message_id, request.into_body()).await,
        Action::Update => handle_update(&context, message_id).await,
        Action::Control => handle_control(&context, &message_id).await,
    }
}

/// Answers every path outside the storage API.
pub async fn handle_invalid(uri: Uri) -> Response {
    tracing::debug!("Rejected request to {}: not a storage path", uri.path());
    invalid_request()
}

async fn handle_get(context: &StorageContext, message_id: &str) -> Response {
    let message = match context.store.get(message_id).await {
        Ok(message) => message,
        Err(e) => {
            tracing::debug!("Get of message {} failed: {}", message_id, e);
            return (
                e.status(),
                format!("Error getting message with ID {}", message_id),
            )
                .into_response();
        }
    };

    json_response(&message, MSG_SERVE_FAILED)
}

async fn handle_put(context: &StorageContext, message_id: String, body: Body) -> Response {
    let content = match read_body_limited(body, context.max_message_size).await {
        Ok(content) => content,
        Err(BodyError::TooLarge { limit }) => {
            tracing::warn!(
                "Refused message {}: body exceeds {} bytes",
                message_id,
                limit
            );
            return (StatusCode::PAYLOAD_TOO_LARGE, MSG_TOO_LARGE).into_response();
        }
        Err(BodyError::Transmission(e)) => {
            tracing::warn!("Reading body of message {} failed: {}", message_id, e);
            return (StatusCode::BAD_REQUEST, MSG_TRANSMISSION_FAILED).into_response();
        }
    };

    let size = content.len();
    let message = Message::new(message_id.clone(), content);

    if let Err(e) = context.store.put(message).await {
        tracing::error!("Failed to store message {}: {}", message_id, e);
        return (e.status(), format!("Error storing message {}", message_id)).into_response();
    }

    tracing::info!("Stored message {} ({} bytes)", message_id, size);
    let response = (
        StatusCode::OK,
        format!("Successfully stored message {}", message_id),
    )
        .into_response();

    // Best-effort; the queue logs and counts a dropped job.
    context.jobs.submit_detached(Job::AnnounceReplication { message_id });

    response
}

async fn handle_update(context: &StorageContext, message_id: String) -> Response {
    let response = (StatusCode::OK, MSG_OK).into_response();

    // Best-effort; the queue logs and counts a dropped job.
    context.jobs.submit_detached(Job::RefreshStatus { message_id });

    response
}

async fn handle_control(context: &StorageContext, sub_action: &str) -> Response {
    match sub_action {
        CONTROL_GET_STORAGE_NODES => {
            match context
                .directory
                .storage_nodes(CONTROL_STORAGE_NODE_LIMIT)
                .await
            {
                Ok(nodes) => json_response(&nodes, MSG_EXPORT_STORAGE_NODES_FAILED),
                Err(e) => {
                    tracing::error!("Listing storage nodes failed: {}", e);
                    (StatusCode::INTERNAL_SERVER_ERROR, MSG_EXPORT_STORAGE_NODES_FAILED)
                        .into_response()
                }
            }
        }
        CONTROL_GET_COORDINATOR_NODES => match context.directory.coordinator_nodes().await {
            Ok(nodes) => json_response(&nodes, MSG_EXPORT_COORDINATOR_NODES_FAILED),
            Err(e) => {
                tracing::error!("Listing coordinator nodes failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, MSG_EXPORT_COORDINATOR_NODES_FAILED)
                    .into_response()
            }
        },
        other => {
            tracing::debug!("Unknown control action {}", other);
            (
                StatusCode::BAD_REQUEST,
                format!("Unknown control action {}", other),
            )
                .into_response()
        }
    }
}

fn invalid_request() -> Response {
    (StatusCode::BAD_REQUEST, MSG_INVALID_REQUEST).into_response()
}

/// Serializes `value` as a 200 JSON response, or answers 500 with
/// `failure_message`.
fn json_response<T: Serialize>(value: &T, failure_message: &'static str) -> Response {
    match serde_json::to_string(value) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Serialization failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, failure_message).into_response()
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BodyError {
    #[error("body exceeds {limit} bytes")]
    TooLarge { limit: usize },
    #[error("body transmission failed: {0}")]
    Transmission(axum::Error),
}

/// Reads a request body, failing as soon as it grows past `limit` bytes.
///
/// A declared `Content-Length` is not trusted; the ceiling is enforced on
/// the bytes actually received.
pub async fn read_body_limited(body: Body, limit: usize) -> Result<Bytes, BodyError> {
    let mut stream = body.into_data_stream();
    let mut buffer = BytesMut::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(BodyError::Transmission)?;
        if buffer.len() + chunk.len() > limit {
            return Err(BodyError::TooLarge { limit });
        }
        buffer.extend_from_slice(&chunk);
    }

    Ok(buffer.freeze())
}
