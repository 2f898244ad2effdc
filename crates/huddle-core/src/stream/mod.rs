mod decoder;
mod emitter;
mod frame;
mod sink;

pub use decoder::FrameDecoder;
pub use emitter::EventEmitter;
pub use frame::{encode_frame, AgentFrame};
pub use sink::{ChannelSink, EventSink, MemorySink, WriterSink};
