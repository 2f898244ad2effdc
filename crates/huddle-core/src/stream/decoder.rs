use super::frame::AgentFrame;
use crate::constants::wire::DATA_PREFIX;
use crate::error::HuddleError;

/// Incremental reader for the event stream.
///
/// Chunks may split frames (and UTF-8 sequences) anywhere; only complete,
/// blank-line-terminated frames are decoded.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return every frame it completed, in order. A frame
    /// with bad JSON yields an `Err` entry; later frames are still decoded.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Result<AgentFrame, HuddleError>> {
        self.buffer.extend_from_slice(chunk);

        let mut out = Vec::new();
        while let Some(end) = find_terminator(&self.buffer) {
            let block: Vec<u8> = self.buffer.drain(..end.0 + end.1).collect();
            if let Some(frame) = decode_block(&block[..end.0]) {
                out.push(frame);
            }
        }
        out
    }

    /// Decode whatever remains once the stream has ended.
    pub fn finish(&mut self) -> Option<Result<AgentFrame, HuddleError>> {
        let block = std::mem::take(&mut self.buffer);
        decode_block(&block)
    }
}

/// (start of terminator, terminator length) for `\n\n` or `\r\n\r\n`.
fn find_terminator(buf: &[u8]) -> Option<(usize, usize)> {
    let lf = buf.windows(2).position(|w| w == b"\n\n").map(|i| (i, 2));
    let crlf = buf.windows(4).position(|w| w == b"\r\n\r\n").map(|i| (i, 4));
    match (lf, crlf) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    }
}

fn decode_block(block: &[u8]) -> Option<Result<AgentFrame, HuddleError>> {
    let text = String::from_utf8_lossy(block);
    let data: Vec<&str> = text
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter_map(|line| line.strip_prefix(DATA_PREFIX))
        .collect();

    if data.is_empty() {
        return None;
    }

    Some(serde_json::from_str(&data.join("\n")).map_err(HuddleError::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::team::Category;

    #[test]
    fn decodes_frame_split_across_chunks() {
        let wire = "data: {\"agent\":\"Engineer\",\"message\":\"héllo\",\"timestamp\":5,\"type\":\"implementation\"}\n\n";
        let bytes = wire.as_bytes();
        let mut decoder = FrameDecoder::new();

        let mut frames = Vec::new();
        for chunk in bytes.chunks(7) {
            frames.extend(decoder.push(chunk));
        }

        assert_eq!(frames.len(), 1);
        let frame = frames.remove(0).unwrap();
        assert_eq!(frame.agent, "Engineer");
        assert_eq!(frame.message, "héllo");
        assert_eq!(frame.kind, Some(Category::Implementation));
    }

    #[test]
    fn tolerates_missing_type() {
        let mut decoder = FrameDecoder::new();
        let frames =
            decoder.push(b"data: {\"agent\":\"A\",\"message\":\"m\",\"timestamp\":1}\n\n");
        assert_eq!(frames.len(), 1);
        assert!(frames[0].as_ref().unwrap().kind.is_none());
    }

    #[test]
    fn bad_frame_does_not_poison_the_next() {
        let mut decoder = FrameDecoder::new();
        let frames = decoder.push(
            b"data: {not json}\n\ndata: {\"agent\":\"B\",\"message\":\"ok\",\"timestamp\":2}\n\n",
        );
        assert_eq!(frames.len(), 2);
        assert!(frames[0].is_err());
        assert_eq!(frames[1].as_ref().unwrap().agent, "B");
    }

    #[test]
    fn ignores_non_data_blocks_and_flushes_tail() {
        let mut decoder = FrameDecoder::new();
        assert!(decoder.push(b": keep-alive\n\n").is_empty());
        assert!(decoder
            .push(b"data: {\"agent\":\"C\",\"message\":\"tail\",\"timestamp\":3}")
            .is_empty());
        let tail = decoder.finish().unwrap().unwrap();
        assert_eq!(tail.message, "tail");
        assert!(decoder.finish().is_none());
    }
}
