//! Incremental Server-Sent-Events parser
//!
//! All five vendors stream over SSE: newline-delimited `event:`/`data:` lines
//! grouped into blocks separated by a blank line. Chunks arrive at arbitrary
//! byte boundaries, so the parser buffers partial lines and yields only
//! complete blocks. A parser instance is single-use per HTTP response.
//!
//! The payload of each block is raw JSON text; decoding happens downstream so
//! a malformed payload degrades to a decode warning instead of aborting the
//! stream.

use bytes::BytesMut;

/// End-of-stream sentinel some vendors send as a literal data payload
const DONE_SENTINEL: &str = "[DONE]";

/// Default event type when a block carries no `event:` line
const DEFAULT_EVENT: &str = "message";

/// A complete parsed SSE block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// Event type from the `event:` line, or `"message"` if absent
    pub event: String,
    /// Concatenated `data:` payload (multi-line payloads joined with `\n`)
    pub data: String,
}

impl SseEvent {
    /// Whether this block is the `[DONE]` end-of-stream sentinel
    pub fn is_done(&self) -> bool {
        self.data == DONE_SENTINEL
    }

    /// Decode the payload as JSON
    ///
    /// # Errors
    ///
    /// Returns the serde error when the payload is not valid JSON; callers
    /// treat this as a non-fatal decode warning.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.data)
    }
}

/// Incremental SSE block parser
///
/// Feed raw chunks with [`push`](Self::push); call [`finish`](Self::finish)
/// once the connection closes to flush a trailing block that was never
/// terminated by a blank line.
#[derive(Debug, Default)]
pub struct SseParser {
    /// Bytes of the current incomplete line
    buffer: BytesMut,
    /// Event type of the block being assembled
    event_type: Option<String>,
    /// Data lines of the block being assembled
    data: Vec<String>,
    /// Set once `[DONE]` was seen; further input is ignored
    terminated: bool,
}

impl SseParser {
    /// Create a parser for one HTTP response
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the stream signalled `[DONE]`
    ///
    /// Once terminated the parser ignores all further input, even if the
    /// underlying connection keeps delivering bytes.
    pub const fn terminated(&self) -> bool {
        self.terminated
    }

    /// Consume a chunk and return the events completed by it
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        if self.terminated {
            return Vec::new();
        }

        self.buffer.extend_from_slice(chunk);
        let mut events = Vec::new();

        while let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') {
            let mut line_bytes = self.buffer.split_to(newline + 1);
            line_bytes.truncate(line_bytes.len() - 1);
            if line_bytes.last() == Some(&b'\r') {
                line_bytes.truncate(line_bytes.len() - 1);
            }

            // Skip lines that are not valid UTF-8 rather than aborting
            let Ok(line) = std::str::from_utf8(&line_bytes) else {
                continue;
            };

            if let Some(event) = self.process_line(line) {
                events.push(event);
                if self.terminated {
                    break;
                }
            }
        }

        events
    }

    /// Flush a trailing block after the connection closed
    ///
    /// Some vendors end the stream without a final blank line; the pending
    /// block is still a complete event at that point.
    pub fn finish(&mut self) -> Option<SseEvent> {
        if self.terminated {
            return None;
        }

        if !self.buffer.is_empty() {
            let pending = self.buffer.split();
            let line = String::from_utf8_lossy(&pending).into_owned();
            let trimmed = line.trim_end_matches('\r').to_owned();
            // A partial line can only contribute, never dispatch
            self.consume_field(&trimmed);
        }

        self.flush_block()
    }

    /// Handle one complete line; a blank line dispatches the pending block
    fn process_line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            return self.flush_block();
        }
        self.consume_field(line);
        None
    }

    /// Accumulate a field line into the pending block
    fn consume_field(&mut self, line: &str) {
        if line.starts_with(':') {
            return;
        }

        if let Some(value) = line.strip_prefix("event:") {
            self.event_type = Some(value.trim_start().to_owned());
        } else if let Some(value) = line.strip_prefix("data:") {
            self.data.push(value.strip_prefix(' ').unwrap_or(value).to_owned());
        }
        // Other fields (id:, retry:) are not needed by any supported vendor
    }

    /// Dispatch the pending block, if it accumulated any data
    fn flush_block(&mut self) -> Option<SseEvent> {
        let event_type = self.event_type.take();
        if self.data.is_empty() {
            return None;
        }

        let data = self.data.join("\n");
        self.data.clear();

        if data == DONE_SENTINEL {
            self.terminated = true;
        }

        Some(SseEvent {
            event: event_type.unwrap_or_else(|| DEFAULT_EVENT.to_owned()),
            data,
        })
    }
}

/// Parse a complete byte buffer into its event sequence
///
/// Equivalent to pushing the whole buffer and finishing; used for the
/// conclusive re-parse over an accumulated stream.
pub fn parse_all(bytes: &[u8]) -> Vec<SseEvent> {
    let mut parser = SseParser::new();
    let mut events = parser.push(bytes);
    events.extend(parser.finish());
    events
}
