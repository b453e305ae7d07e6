//! Line-oriented SSE decoding for the chat completions stream.
//!
//! The provider frames events as `data: <json>` lines, closing with a
//! `data: [DONE]` sentinel. Transport chunks arrive at arbitrary byte
//! boundaries, so the decoder buffers raw bytes and only decodes complete
//! lines. Splitting happens on the `\n` byte before any UTF-8 decoding: a
//! multi-byte character cut in half by a chunk boundary simply stays in the
//! buffer until the rest of its line arrives.

use serde::Deserialize;

pub const DATA_PREFIX: &str = "data: ";
pub const DONE_SENTINEL: &str = "[DONE]";

/// Reassembles complete lines out of a chunked byte stream.
#[derive(Debug, Default)]
pub struct SseLineDecoder {
    pending: Vec<u8>,
}

impl SseLineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one transport chunk, returning every line it completes.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.pending.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw[..pos]);
            lines.push(line.trim_end_matches('\r').to_string());
        }
        lines
    }

    /// Flush the trailing unterminated line once the transport signals
    /// end-of-data. The provider may close without a final newline.
    pub fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let raw = std::mem::take(&mut self.pending);
        let line = String::from_utf8_lossy(&raw)
            .trim_end_matches('\r')
            .to_string();
        (!line.is_empty()).then_some(line)
    }
}

#[derive(Debug, Deserialize)]
struct StreamResponse {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: StreamDelta,
}

#[derive(Debug, Default, Deserialize)]
struct StreamDelta {
    content: Option<String>,
}

/// Extract the content delta carried by one decoded line, if any.
///
/// Lines without the `data: ` prefix and the `[DONE]` sentinel are
/// discarded silently. A payload that fails to parse is logged and
/// skipped; one malformed event never aborts the stream. An event whose
/// delta carries no text is valid and yields nothing.
pub fn content_delta(line: &str) -> Option<String> {
    let payload = line.strip_prefix(DATA_PREFIX)?.trim();
    if payload.is_empty() || payload == DONE_SENTINEL {
        return None;
    }

    let parsed: StreamResponse = match serde_json::from_str(payload) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::warn!(%err, raw = payload, "skipping malformed stream event");
            return None;
        }
    };

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .filter(|content| !content.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_complete_lines_and_keeps_the_remainder() {
        let mut decoder = SseLineDecoder::new();
        let lines = decoder.push(b"data: one\ndata: two\ndata: thr");
        assert_eq!(lines, vec!["data: one", "data: two"]);

        let lines = decoder.push(b"ee\n");
        assert_eq!(lines, vec!["data: three"]);
        assert_eq!(decoder.finish(), None);
    }

    #[test]
    fn strips_carriage_returns() {
        let mut decoder = SseLineDecoder::new();
        let lines = decoder.push(b"data: one\r\ndata: two\r\n");
        assert_eq!(lines, vec!["data: one", "data: two"]);
    }

    #[test]
    fn multibyte_character_split_across_chunks_survives() {
        let text = "data: h\u{00e9}llo\n";
        let bytes = text.as_bytes();
        // '\u{00e9}' is two bytes; cut right between them
        let cut = text.find('\u{00e9}').unwrap() + 1;

        let mut decoder = SseLineDecoder::new();
        assert!(decoder.push(&bytes[..cut]).is_empty());
        let lines = decoder.push(&bytes[cut..]);
        assert_eq!(lines, vec!["data: h\u{00e9}llo"]);
    }

    #[test]
    fn finish_flushes_an_unterminated_trailing_line() {
        let mut decoder = SseLineDecoder::new();
        assert!(decoder.push(b"data: tail").is_empty());
        assert_eq!(decoder.finish().as_deref(), Some("data: tail"));
        assert_eq!(decoder.finish(), None);
    }

    #[test]
    fn extracts_content_from_a_delta_event() {
        let line = r#"data: {"choices":[{"delta":{"content":"Hel"}}]}"#;
        assert_eq!(content_delta(line).as_deref(), Some("Hel"));
    }

    #[test]
    fn ignores_lines_without_the_event_prefix() {
        assert_eq!(content_delta(""), None);
        assert_eq!(content_delta(": keep-alive"), None);
        assert_eq!(content_delta("event: ping"), None);
        assert_eq!(content_delta("data:{\"no\":\"space\"}"), None);
    }

    #[test]
    fn done_sentinel_and_empty_payload_yield_nothing() {
        assert_eq!(content_delta("data: [DONE]"), None);
        assert_eq!(content_delta("data: "), None);
    }

    #[test]
    fn malformed_payload_is_skipped() {
        assert_eq!(content_delta("data: {not json"), None);
    }

    #[test]
    fn event_without_text_is_valid_and_yields_nothing() {
        assert_eq!(content_delta(r#"data: {"choices":[{"delta":{}}]}"#), None);
        assert_eq!(content_delta(r#"data: {"choices":[]}"#), None);
        assert_eq!(
            content_delta(r#"data: {"choices":[{"delta":{"content":""}}]}"#),
            None
        );
        assert_eq!(content_delta(r#"data: {"id":"cmpl-1"}"#), None);
    }
}
