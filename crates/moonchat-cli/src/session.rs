//! One interactive chat session against the relay.

use std::pin::pin;

use futures::StreamExt;
use moonchat_ai::{STREAM_ERROR_FALLBACK, Transcript, TranscriptAccumulator};
use reqwest::Client;
use serde_json::json;

/// How one submitted turn ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStatus {
    /// Blank input: no transcript mutation, no request.
    Skipped,
    Completed,
    /// The relay or the transport failed; the fallback entry was appended.
    Failed,
    /// Ctrl-C aborted the stream; content already applied stays in place.
    Cancelled,
}

pub struct ChatSession {
    client: Client,
    base_url: String,
    transcript: Transcript,
}

impl ChatSession {
    pub fn new(server_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: server_url.trim_end_matches('/').to_string(),
            transcript: Transcript::new(),
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Verify the relay is reachable before entering the input loop.
    pub async fn check_health(&self) -> anyhow::Result<()> {
        self.client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(|err| {
                anyhow::anyhow!("cannot reach the relay at {}: {}", self.base_url, err)
            })?
            .error_for_status()
            .map_err(|err| anyhow::anyhow!("relay health check failed: {}", err))?;
        Ok(())
    }

    /// Run one turn to completion, feeding every applied content delta to
    /// `on_delta` for incremental rendering.
    ///
    /// Overlapping submissions are rejected by construction: this method
    /// borrows the session exclusively until the stream has completed,
    /// failed, or been cancelled, so a second turn cannot start while one
    /// is in flight.
    pub async fn submit(&mut self, input: &str, mut on_delta: impl FnMut(&str)) -> TurnStatus {
        let message = input.trim();
        if message.is_empty() {
            return TurnStatus::Skipped;
        }

        self.transcript.push_user(message);

        let response = match self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&json!({ "message": message }))
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                tracing::error!(status = %response.status(), "relay returned an error");
                self.transcript.push_error(STREAM_ERROR_FALLBACK);
                return TurnStatus::Failed;
            }
            Err(err) => {
                tracing::error!(%err, "relay request failed");
                self.transcript.push_error(STREAM_ERROR_FALLBACK);
                return TurnStatus::Failed;
            }
        };

        let mut accumulator = TranscriptAccumulator::new();
        let mut stream = pin!(response.bytes_stream());
        let mut ctrl_c = pin!(tokio::signal::ctrl_c());

        loop {
            tokio::select! {
                _ = &mut ctrl_c => {
                    // Dropping the stream aborts the in-flight request
                    tracing::debug!("stream cancelled");
                    return TurnStatus::Cancelled;
                }
                next = stream.next() => match next {
                    None => break,
                    Some(Ok(chunk)) => {
                        for delta in accumulator.push_chunk(&chunk, &mut self.transcript) {
                            on_delta(&delta);
                        }
                    }
                    Some(Err(err)) => {
                        tracing::error!(%err, "chat stream read failed");
                        self.transcript.push_error(STREAM_ERROR_FALLBACK);
                        return TurnStatus::Failed;
                    }
                },
            }
        }

        if let Some(delta) = accumulator.finish(&mut self.transcript) {
            on_delta(&delta);
        }
        TurnStatus::Completed
    }
}
