use super::frame::encode_frame;
use super::sink::EventSink;
use crate::error::HuddleError;
use crate::team::TeamMessage;

/// Writes messages to a sink as frames, in production order, and guarantees
/// the sink is closed exactly once.
pub struct EventEmitter<S: EventSink> {
    sink: S,
    emitted: usize,
    detached: bool,
    closed: bool,
}

impl<S: EventSink> EventEmitter<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            emitted: 0,
            detached: false,
            closed: false,
        }
    }

    /// Encode and write one message immediately.
    ///
    /// Encoding errors are returned. A write that fails because the consumer
    /// went away is logged and swallowed; the emitter is then detached.
    pub fn emit(&mut self, message: &TeamMessage) -> Result<(), HuddleError> {
        let frame = encode_frame(message)?;

        if self.closed || self.detached {
            tracing::debug!("Dropping frame from {}: channel no longer open", message.agent());
            return Ok(());
        }

        match self.sink.send(frame) {
            Ok(()) => self.emitted += 1,
            Err(e) => {
                tracing::debug!("Consumer detached while emitting {}: {}", message.agent(), e);
                self.detached = true;
            }
        }
        Ok(())
    }

    /// True while frames can still reach a consumer.
    pub fn is_live(&self) -> bool {
        !self.closed && !self.detached && self.sink.is_open()
    }

    /// Idempotent.
    pub fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.sink.close();
        }
    }

    pub fn emitted(&self) -> usize {
        self.emitted
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl<S: EventSink> Drop for EventEmitter<S> {
    fn drop(&mut self) {
        self.close();
    }
}
