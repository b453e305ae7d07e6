use axum::{
    Json,
    body::Body,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::api::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

// POST /api/chat
//
// Relays the provider's event stream byte-for-byte. The body is never
// parsed or buffered here; framing and latency are the provider's.
pub async fn relay_chat(
    State(client): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Response {
    if request.message.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "message must not be empty");
    }

    match client.stream_chat(&request.message).await {
        Ok(upstream) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "text/event-stream")
            .body(Body::from_stream(upstream.bytes_stream()))
            .unwrap_or_else(|err| {
                tracing::error!(%err, "failed to build relay response");
                error_response(StatusCode::BAD_GATEWAY, "failed to build relay response")
            }),
        Err(err) => {
            tracing::error!(%err, "provider request failed");
            error_response(StatusCode::BAD_GATEWAY, err.to_string())
        }
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}
