pub mod config;
pub mod constants;
pub mod error;
pub mod llm;
pub mod stream;
pub mod team;

// Re-export key types
pub use config::Settings;
pub use error::HuddleError;
pub use llm::{ClaudeClient, LlmClient, LlmResponse, Message, Role};
pub use stream::{AgentFrame, ChannelSink, EventEmitter, EventSink, FrameDecoder, MemorySink, WriterSink};
pub use team::{
    Category, Invocation, ModelInvoker, RoleId, RoleProfile, RoleRegistry, RosterEntry,
    SessionOrchestrator, SessionReport, SessionState, TeamMessage, Transcript,
};
