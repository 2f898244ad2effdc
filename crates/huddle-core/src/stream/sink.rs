use crate::error::HuddleError;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::UnboundedSender;

/// Single-producer output channel for encoded frames.
pub trait EventSink: Send {
    /// Write one encoded frame. Fails once the consumer is gone.
    fn send(&mut self, frame: String) -> Result<(), HuddleError>;

    /// End the channel. Callers close once; implementations tolerate repeats.
    fn close(&mut self);

    /// Whether a consumer is still attached.
    fn is_open(&self) -> bool;
}

/// Feeds a tokio channel; the receiving half backs an HTTP response body.
pub struct ChannelSink {
    tx: Option<UnboundedSender<String>>,
}

impl ChannelSink {
    pub fn new(tx: UnboundedSender<String>) -> Self {
        Self { tx: Some(tx) }
    }
}

impl EventSink for ChannelSink {
    fn send(&mut self, frame: String) -> Result<(), HuddleError> {
        match self.tx {
            Some(ref tx) => tx.send(frame).map_err(|_| HuddleError::ChannelClosed),
            None => Err(HuddleError::ChannelClosed),
        }
    }

    fn close(&mut self) {
        // Dropping the sender ends the receiver's stream.
        self.tx.take();
    }

    fn is_open(&self) -> bool {
        self.tx.as_ref().is_some_and(|tx| !tx.is_closed())
    }
}

/// Writes frames to any `Write`, flushing after each one.
pub struct WriterSink<W: Write + Send> {
    writer: Option<W>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Some(writer),
        }
    }
}

impl<W: Write + Send> EventSink for WriterSink<W> {
    fn send(&mut self, frame: String) -> Result<(), HuddleError> {
        let writer = self.writer.as_mut().ok_or(HuddleError::ChannelClosed)?;
        writer.write_all(frame.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    fn close(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }

    fn is_open(&self) -> bool {
        self.writer.is_some()
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    frames: Vec<String>,
    close_calls: usize,
    detach_after: Option<usize>,
}

/// In-memory sink for headless runs. Clones share the same buffer, so a test
/// keeps one handle and hands the other to the orchestrator.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    state: Arc<Mutex<MemoryState>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose consumer disconnects after `n` frames have been received.
    pub fn detaching_after(n: usize) -> Self {
        let sink = Self::default();
        sink.lock().detach_after = Some(n);
        sink
    }

    pub fn frames(&self) -> Vec<String> {
        self.lock().frames.clone()
    }

    /// Everything written so far, concatenated as it would appear on the wire.
    pub fn contents(&self) -> String {
        self.lock().frames.concat()
    }

    pub fn close_calls(&self) -> usize {
        self.lock().close_calls
    }

    pub fn is_closed(&self) -> bool {
        self.lock().close_calls > 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        // A poisoned buffer is still readable; the data is append-only.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl EventSink for MemorySink {
    fn send(&mut self, frame: String) -> Result<(), HuddleError> {
        let mut state = self.lock();
        if state.close_calls > 0 {
            return Err(HuddleError::ChannelClosed);
        }
        if let Some(limit) = state.detach_after {
            if state.frames.len() >= limit {
                return Err(HuddleError::ChannelClosed);
            }
        }
        state.frames.push(frame);
        Ok(())
    }

    fn close(&mut self) {
        self.lock().close_calls += 1;
    }

    fn is_open(&self) -> bool {
        let state = self.lock();
        state.close_calls == 0
            && state
                .detach_after
                .map_or(true, |limit| state.frames.len() < limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn channel_sink_close_ends_receiver() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut sink = ChannelSink::new(tx);
        sink.send("a".to_string()).unwrap();
        sink.close();
        assert!(!sink.is_open());
        assert_eq!(rx.recv().await.as_deref(), Some("a"));
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn channel_sink_notices_dropped_receiver() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let mut sink = ChannelSink::new(tx);
        drop(rx);
        assert!(!sink.is_open());
        assert!(matches!(
            sink.send("a".to_string()),
            Err(HuddleError::ChannelClosed)
        ));
    }

    #[test]
    fn writer_sink_writes_frames_in_order() {
        let mut buf = Vec::new();
        {
            let mut sink = WriterSink::new(&mut buf);
            sink.send("one".to_string()).unwrap();
            sink.send("two".to_string()).unwrap();
            sink.close();
            assert!(sink.send("three".to_string()).is_err());
        }
        assert_eq!(String::from_utf8(buf).unwrap(), "onetwo");
    }

    #[test]
    fn memory_sink_detaches_after_limit() {
        let handle = MemorySink::detaching_after(1);
        let mut sink = handle.clone();
        assert!(sink.is_open());
        sink.send("first".to_string()).unwrap();
        assert!(!sink.is_open());
        assert!(sink.send("second".to_string()).is_err());
        assert_eq!(handle.frames(), vec!["first".to_string()]);
    }
}
