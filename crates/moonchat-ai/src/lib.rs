//! Moonchat AI - provider client and streaming transcript accumulator
//!
//! This crate provides:
//! - A Moonshot chat completions client (OpenAI-compatible wire format)
//! - Line-oriented SSE decoding tolerant of arbitrary chunk boundaries
//! - The transcript accumulator folding content deltas into a message list

pub mod accumulator;
pub mod error;
pub mod moonshot;
pub mod sse;
pub mod transcript;

// Re-export commonly used types
pub use accumulator::{STREAM_ERROR_FALLBACK, TranscriptAccumulator};
pub use error::{AiError, Result};
pub use moonshot::MoonshotClient;
pub use sse::SseLineDecoder;
pub use transcript::{ChatMessage, Sender, Transcript};
