//! Folds the provider byte stream into the transcript.
//!
//! One accumulator drives one assistant turn: it reassembles SSE lines out
//! of transport chunks, keeps the running text of the turn, and rewrites
//! the active assistant entry after every content delta. The caller owns
//! the read loop (pull one chunk, push it here) so ordering, cancellation,
//! and error handling stay explicit at the call site.

use crate::sse::{SseLineDecoder, content_delta};
use crate::transcript::Transcript;

/// Text substituted for the assistant's turn when the transport fails.
pub const STREAM_ERROR_FALLBACK: &str =
    "Something went wrong while reading the reply. Please try again.";

#[derive(Debug, Default)]
pub struct TranscriptAccumulator {
    lines: SseLineDecoder,
    buffer: String,
}

impl TranscriptAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one transport chunk. Every content delta the chunk completes
    /// is folded into `transcript` in arrival order and returned so the
    /// caller can render it incrementally.
    pub fn push_chunk(&mut self, chunk: &[u8], transcript: &mut Transcript) -> Vec<String> {
        let mut applied = Vec::new();
        for line in self.lines.push(chunk) {
            if let Some(delta) = self.apply_line(&line, transcript) {
                applied.push(delta);
            }
        }
        applied
    }

    /// Process the trailing unterminated line once the transport signals
    /// end-of-data.
    pub fn finish(&mut self, transcript: &mut Transcript) -> Option<String> {
        let line = self.lines.finish()?;
        self.apply_line(&line, transcript)
    }

    /// Full text accumulated for the current turn so far.
    pub fn assistant_text(&self) -> &str {
        &self.buffer
    }

    fn apply_line(&mut self, line: &str, transcript: &mut Transcript) -> Option<String> {
        let delta = content_delta(line)?;
        self.buffer.push_str(&delta);
        transcript.apply_assistant(&self.buffer);
        Some(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::Sender;

    const STREAM: &str = "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n\
                          data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n\n\
                          data: [DONE]\n";

    fn feed(acc: &mut TranscriptAccumulator, transcript: &mut Transcript, chunks: &[&[u8]]) {
        for chunk in chunks {
            let _ = acc.push_chunk(chunk, transcript);
        }
        let _ = acc.finish(transcript);
    }

    #[test]
    fn two_deltas_and_the_sentinel_make_one_assistant_message() {
        let mut acc = TranscriptAccumulator::new();
        let mut transcript = Transcript::new();
        transcript.push_user("say hello");

        feed(&mut acc, &mut transcript, &[STREAM.as_bytes()]);

        let messages = transcript.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].sender, Sender::Assistant);
        assert_eq!(messages[1].content, "Hello");
    }

    #[test]
    fn reconstruction_is_independent_of_chunk_boundaries() {
        let expected = {
            let mut acc = TranscriptAccumulator::new();
            let mut transcript = Transcript::new();
            feed(&mut acc, &mut transcript, &[STREAM.as_bytes()]);
            transcript.last().unwrap().content.clone()
        };

        // byte-at-a-time covers every possible boundary, including mid-line
        let mut acc = TranscriptAccumulator::new();
        let mut transcript = Transcript::new();
        for byte in STREAM.as_bytes() {
            let _ = acc.push_chunk(&[*byte], &mut transcript);
        }
        let _ = acc.finish(&mut transcript);
        assert_eq!(transcript.last().unwrap().content, expected);
    }

    #[test]
    fn chunk_boundary_inside_a_multibyte_character() {
        let stream = "data: {\"choices\":[{\"delta\":{\"content\":\"caf\u{00e9} \u{2615}\"}}]}\n";
        let bytes = stream.as_bytes();
        // split inside the three-byte '\u{2615}' sequence
        let cut = stream.find('\u{2615}').unwrap() + 1;

        let mut acc = TranscriptAccumulator::new();
        let mut transcript = Transcript::new();
        let _ = acc.push_chunk(&bytes[..cut], &mut transcript);
        let _ = acc.push_chunk(&bytes[cut..], &mut transcript);
        let _ = acc.finish(&mut transcript);

        assert_eq!(transcript.last().unwrap().content, "caf\u{00e9} \u{2615}");
    }

    #[test]
    fn malformed_line_does_not_block_later_deltas() {
        let stream = "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\
                      data: {broken\n\
                      data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n";

        let mut acc = TranscriptAccumulator::new();
        let mut transcript = Transcript::new();
        feed(&mut acc, &mut transcript, &[stream.as_bytes()]);

        assert_eq!(transcript.last().unwrap().content, "Hello");
    }

    #[test]
    fn sentinel_text_never_reaches_the_transcript() {
        let mut acc = TranscriptAccumulator::new();
        let mut transcript = Transcript::new();
        feed(&mut acc, &mut transcript, &[STREAM.as_bytes()]);

        for message in transcript.messages() {
            assert!(!message.content.contains("[DONE]"));
        }
    }

    #[test]
    fn multiple_content_lines_in_one_chunk_apply_in_order() {
        let chunk = "data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\n\
                     data: {\"choices\":[{\"delta\":{\"content\":\"b\"}}]}\n\
                     data: {\"choices\":[{\"delta\":{\"content\":\"c\"}}]}\n";

        let mut acc = TranscriptAccumulator::new();
        let mut transcript = Transcript::new();
        let applied = acc.push_chunk(chunk.as_bytes(), &mut transcript);

        assert_eq!(applied, vec!["a", "b", "c"]);
        assert_eq!(transcript.last().unwrap().content, "abc");
        assert_eq!(transcript.len(), 1, "deltas fold into a single entry");
    }

    #[test]
    fn unterminated_trailing_line_is_applied_at_end_of_data() {
        let mut acc = TranscriptAccumulator::new();
        let mut transcript = Transcript::new();
        acc.push_chunk(
            b"data: {\"choices\":[{\"delta\":{\"content\":\"tail\"}}]}",
            &mut transcript,
        );
        assert!(transcript.is_empty(), "no newline yet, nothing applied");

        let applied = acc.finish(&mut transcript);
        assert_eq!(applied.as_deref(), Some("tail"));
        assert_eq!(transcript.last().unwrap().content, "tail");
    }

    #[test]
    fn events_without_text_leave_the_transcript_untouched() {
        let stream = "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\
                      data: {\"choices\":[{\"delta\":{}}]}\n";

        let mut acc = TranscriptAccumulator::new();
        let mut transcript = Transcript::new();
        feed(&mut acc, &mut transcript, &[stream.as_bytes()]);

        assert!(transcript.is_empty());
        assert_eq!(acc.assistant_text(), "");
    }

    #[test]
    fn a_second_turn_never_touches_the_sealed_first_answer() {
        let mut transcript = Transcript::new();

        transcript.push_user("first");
        let mut acc = TranscriptAccumulator::new();
        feed(&mut acc, &mut transcript, &[STREAM.as_bytes()]);

        transcript.push_user("second");
        let second = "data: {\"choices\":[{\"delta\":{\"content\":\"Bye\"}}]}\n";
        let mut acc = TranscriptAccumulator::new();
        feed(&mut acc, &mut transcript, &[second.as_bytes()]);

        let messages = transcript.messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[1].content, "Hello");
        assert_eq!(messages[3].content, "Bye");
    }
}
