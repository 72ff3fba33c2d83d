//! Server-sent events line decoding.
//!
//! Network chunks can end anywhere, including inside a line or a
//! multi-byte character, so bytes are buffered until a full line is
//! available and only complete lines are decoded.

/// One decoded SSE item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// Payload of a `data:` line
    Data(String),
    /// The `data: [DONE]` terminator
    Done,
}

/// Incremental SSE decoder
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes and return the events completed by them.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(bytes);

        let mut events = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            if let Some(event) = decode_line(&line) {
                events.push(event);
            }
        }
        events
    }

    /// Decode whatever is left once the stream has ended.
    pub fn finish(&mut self) -> Option<SseEvent> {
        let rest = std::mem::take(&mut self.buffer);
        decode_line(&rest)
    }
}

fn decode_line(raw: &[u8]) -> Option<SseEvent> {
    let line = String::from_utf8_lossy(raw);
    let line = line.trim_end_matches(['\n', '\r']);

    // Comments, `event:`/`id:` fields and blank separators carry no payload
    let data = line.strip_prefix("data:")?;
    let data = data.strip_prefix(' ').unwrap_or(data);

    if data == "[DONE]" {
        Some(SseEvent::Done)
    } else {
        Some(SseEvent::Data(data.to_string()))
    }
}
